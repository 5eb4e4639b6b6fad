use std::ops::Range;
use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::activation::activation::DerivativeMode;
use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::layers::dense::{forward, BatchActivations};
use crate::loss::mse::MseLoss;
use crate::math::weights::WeightStore;
use crate::network::network::Network;
use crate::network::topology::Topology;
use crate::optim::accumulator::GradientAccumulator;
use crate::optim::sgd::Sgd;
use crate::train::backprop::backward;
use crate::train::batch_stats::BatchStats;
use crate::train::batching::batch_windows;
use crate::train::parallel::backward_parallel;
use crate::train::train_config::TrainConfig;

/// What a completed `train` run measured.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    /// Mean per-sample MSE of each epoch, measured during the forward pass
    /// (before that batch's update). Samples in an overlapping trailing
    /// window count twice.
    pub epoch_errors: Vec<f64>,
    pub batches_per_epoch: usize,
}

impl TrainSummary {
    pub fn final_error(&self) -> Option<f64> {
        self.epoch_errors.last().copied()
    }
}

/// Trains `network` in place on `data`.
///
/// Each epoch walks the batch windows from `batch_windows` in order. A batch
/// runs its forward passes, its backward passes (on the calling thread when
/// `config.workers == 1`, otherwise on up to `config.workers` scoped
/// threads) and exactly one gradient update before the next batch starts.
///
/// Configuration and dataset shape are validated before the first epoch.
/// A failed backward worker aborts the run with `NetError::WorkerPanicked`.
pub fn train(network: &mut Network, data: &Dataset, config: &TrainConfig) -> Result<TrainSummary> {
    config.validate()?;
    data.validate_for(&network.topology)?;
    let optimizer = Sgd::new(config.learning_rate)?;

    let topology = &network.topology;
    let weights = &mut network.weights;
    let windows = batch_windows(data.len(), config.batch_size, config.tail_policy);
    let mut slots = BatchActivations::new(topology, config.batch_size);
    let mut grads = Mutex::new(GradientAccumulator::new(topology));

    info!(
        layers = ?topology.sizes(),
        samples = data.len(),
        batches = windows.len(),
        epochs = config.epochs,
        workers = config.workers,
        "training started"
    );

    let mut epoch_errors = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        let report = config.is_report_epoch(epoch);
        let mut epoch_error = 0.0;
        let mut epoch_samples = 0;

        for (b, window) in windows.iter().enumerate() {
            let batch_error = if config.workers == 1 {
                let streaming = exclusive(&mut grads)?;
                run_sequential_batch(topology, weights, &mut slots, data, window.clone(), config.derivative, streaming)?
            } else {
                run_parallel_batch(topology, weights, &mut slots, data, window.clone(), config, &grads)?
            };

            optimizer.step(weights, exclusive(&mut grads)?);

            epoch_error += batch_error;
            epoch_samples += window.len();
            let mean = batch_error / window.len() as f64;
            debug!(epoch, batch = b + 1, error = mean, "batch updated");

            if report {
                info!(epoch, batch = b + 1, start = window.start, end = window.end, "error = {mean:.5}");
                emit(config, BatchStats {
                    epoch,
                    total_epochs: config.epochs,
                    batch: b + 1,
                    window_start: window.start,
                    window_end: window.end,
                    error: mean,
                    elapsed_ms: t_start.elapsed().as_millis() as u64,
                });
            }
        }

        epoch_errors.push(epoch_error / epoch_samples as f64);
    }

    info!(final_error = epoch_errors.last().copied().unwrap_or_default(), "training finished");
    Ok(TrainSummary {
        epoch_errors,
        batches_per_epoch: windows.len(),
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Forward then backward per sample, streaming into `grads`.
/// Returns the summed error of the window.
fn run_sequential_batch(
    topology: &Topology,
    weights: &WeightStore,
    slots: &mut BatchActivations,
    data: &Dataset,
    window: Range<usize>,
    mode: DerivativeMode,
    grads: &mut GradientAccumulator,
) -> Result<f64> {
    let mut total = 0.0;
    for (slot, idx) in window.enumerate() {
        let expected = &data.targets()[idx];
        let output = forward(topology, weights, &data.inputs()[idx], slots.slot_mut(slot))?;
        total += MseLoss::loss(output, expected);
        backward(topology, weights, slots.slot(slot), expected, mode, grads)?;
    }
    Ok(total)
}

/// All forward passes first, then the worker-parallel backward pass.
/// Returns the summed error of the window.
fn run_parallel_batch(
    topology: &Topology,
    weights: &WeightStore,
    slots: &mut BatchActivations,
    data: &Dataset,
    window: Range<usize>,
    config: &TrainConfig,
    grads: &Mutex<GradientAccumulator>,
) -> Result<f64> {
    let mut total = 0.0;
    for (slot, idx) in window.clone().enumerate() {
        let output = forward(topology, weights, &data.inputs()[idx], slots.slot_mut(slot))?;
        total += MseLoss::loss(output, &data.targets()[idx]);
    }

    backward_parallel(
        topology,
        weights,
        slots.filled(window.len()),
        &data.targets()[window],
        config.workers,
        config.derivative,
        grads,
    )?;
    Ok(total)
}

/// Lock-free access once no worker is running.
fn exclusive(grads: &mut Mutex<GradientAccumulator>) -> Result<&mut GradientAccumulator> {
    grads
        .get_mut()
        .map_err(|_| NetError::WorkerPanicked { worker: 0 })
}

fn emit(config: &TrainConfig, stats: BatchStats) {
    if let Some(ref tx) = config.progress_tx {
        if tx.send(stats).is_err() {
            warn!("progress receiver dropped; continuing without it");
        }
    }
}
