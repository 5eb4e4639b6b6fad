use std::ops::Range;
use std::sync::Mutex;
use std::thread;

use tracing::debug;

use crate::activation::activation::DerivativeMode;
use crate::error::{NetError, Result};
use crate::layers::dense::SampleActivations;
use crate::math::weights::WeightStore;
use crate::network::topology::Topology;
use crate::optim::accumulator::GradientAccumulator;
use crate::train::backprop::backward;

/// Splits `0..len` into contiguous chunks of `ceil(len / workers)`.
/// Only non-empty chunks come back, so there are never more ranges than
/// `len`, however large `workers` is.
pub fn worker_chunks(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 || workers == 0 {
        return Vec::new();
    }
    let chunk = len.div_ceil(workers);
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}

/// Backward pass for a filled batch, split across scoped worker threads.
///
/// `slots[i]` must hold the forward pass of the sample whose target is
/// `expected[i]`. Each worker accumulates into a private
/// `GradientAccumulator` and takes the lock on `shared` exactly once, to
/// merge. Returns after every worker has merged.
pub fn backward_parallel(
    topology: &Topology,
    weights: &WeightStore,
    slots: &[SampleActivations],
    expected: &[Vec<f64>],
    workers: usize,
    mode: DerivativeMode,
    shared: &Mutex<GradientAccumulator>,
) -> Result<()> {
    if slots.len() != expected.len() {
        return Err(NetError::shape("batch targets", slots.len(), expected.len()));
    }

    let chunks = worker_chunks(slots.len(), workers);
    debug!(workers = chunks.len(), samples = slots.len(), "launching backward workers");

    thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .enumerate()
            .map(|(worker, range)| {
                let handle = scope.spawn(move || -> Result<()> {
                    let mut local = GradientAccumulator::new(topology);
                    for i in range {
                        backward(topology, weights, &slots[i], &expected[i], mode, &mut local)?;
                    }
                    let mut total = shared
                        .lock()
                        .map_err(|_| NetError::WorkerPanicked { worker })?;
                    total.merge(&local);
                    Ok(())
                });
                (worker, handle)
            })
            .collect();

        for (worker, handle) in handles {
            handle
                .join()
                .map_err(|_| NetError::WorkerPanicked { worker })??;
        }
        Ok(())
    })
}

/// Convenience wrapper around [`backward_parallel`] that starts from an
/// empty accumulator and returns it.
pub fn accumulate_parallel(
    topology: &Topology,
    weights: &WeightStore,
    slots: &[SampleActivations],
    expected: &[Vec<f64>],
    workers: usize,
    mode: DerivativeMode,
) -> Result<GradientAccumulator> {
    let shared = Mutex::new(GradientAccumulator::new(topology));
    backward_parallel(topology, weights, slots, expected, workers, mode, &shared)?;
    shared
        .into_inner()
        .map_err(|_| NetError::WorkerPanicked { worker: 0 })
}
