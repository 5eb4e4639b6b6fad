use crate::activation::activation::{ActivationFunction, DerivativeMode};
use crate::error::{NetError, Result};
use crate::layers::dense::SampleActivations;
use crate::loss::mse::MseLoss;
use crate::math::weights::WeightStore;
use crate::network::topology::Topology;
use crate::optim::accumulator::GradientAccumulator;

/// Backpropagates one sample and adds its raw gradient contributions to
/// `grads`.
///
/// `acts` must hold the forward pass of this same sample. Deltas live only
/// for the duration of the call; the learning rate is not applied here.
pub fn backward(
    topology: &Topology,
    weights: &WeightStore,
    acts: &SampleActivations,
    expected: &[f64],
    mode: DerivativeMode,
    grads: &mut GradientAccumulator,
) -> Result<()> {
    if expected.len() != topology.output_size() {
        return Err(NetError::shape("expected output", topology.output_size(), expected.len()));
    }

    let deltas = layer_deltas(topology, weights, acts, expected, mode);

    let sums = grads.sums_mut();
    for (t, delta) in deltas.iter().enumerate() {
        let src = acts.layer(t);
        let width = delta.len();
        let matrix = sums.connections_mut(t);
        for (j, &a) in src.iter().enumerate() {
            let row = &mut matrix[j * width..(j + 1) * width];
            for (g, d) in row.iter_mut().zip(delta) {
                *g += d * a;
            }
        }
        if let Some(bias) = sums.bias_mut(t) {
            for (g, d) in bias.iter_mut().zip(delta) {
                *g += d;
            }
        }
    }
    grads.record_sample();

    Ok(())
}

/// Error signal for every non-input layer; `deltas[t]` belongs to the
/// destination layer of transition `t`.
pub fn layer_deltas(
    topology: &Topology,
    weights: &WeightStore,
    acts: &SampleActivations,
    expected: &[f64],
    mode: DerivativeMode,
) -> Vec<Vec<f64>> {
    let n = topology.transitions();
    let mut deltas: Vec<Vec<f64>> = topology.sizes()[1..].iter().map(|&s| vec![0.0; s]).collect();

    // Output layer is unsquashed: the delta is the MSE derivative alone.
    MseLoss::derivative_into(acts.output(), expected, &mut deltas[n - 1]);

    for t in (0..n - 1).rev() {
        let layer = t + 1;
        let (head, tail) = deltas.split_at_mut(t + 1);
        let delta = &mut head[t];
        let next = &tail[0];
        let next_width = next.len();
        let matrix = weights.connections(t + 1);
        let post = acts.layer(layer);
        let pre = acts.pre_activation(layer);

        for (j, d) in delta.iter_mut().enumerate() {
            let row = &matrix[j * next_width..(j + 1) * next_width];
            let sum: f64 = row.iter().zip(next).map(|(w, nd)| w * nd).sum();
            *d = sum * mode.evaluate(ActivationFunction::ScaledSoftsign, pre[j], post[j]);
        }
    }

    deltas
}
