use crate::activation::activation::{normalize, ActivationFunction};
use crate::error::{NetError, Result};
use crate::math::weights::WeightStore;
use crate::network::topology::Topology;

/// Activations of one sample, one vector per layer.
///
/// `neurons` holds the final values (post-normalization, post-squash on
/// hidden layers); `pre_neurons` holds the normalized values before the
/// squash, needed by the exact derivative.
#[derive(Debug, Clone)]
pub struct SampleActivations {
    neurons: Vec<Vec<f64>>,
    pre_neurons: Vec<Vec<f64>>,
}

impl SampleActivations {
    pub fn new(topology: &Topology) -> SampleActivations {
        let neurons: Vec<Vec<f64>> = topology.sizes().iter().map(|&s| vec![0.0; s]).collect();
        SampleActivations {
            pre_neurons: neurons.clone(),
            neurons,
        }
    }

    pub fn layer(&self, layer: usize) -> &[f64] {
        &self.neurons[layer]
    }

    pub fn pre_activation(&self, layer: usize) -> &[f64] {
        &self.pre_neurons[layer]
    }

    pub fn output(&self) -> &[f64] {
        &self.neurons[self.neurons.len() - 1]
    }
}

/// Fixed set of batch slots reused across batches.
///
/// A slot is written by the forward pass and read by the backward pass of
/// the same batch; the next batch may only overwrite it after the update.
#[derive(Debug, Clone)]
pub struct BatchActivations {
    slots: Vec<SampleActivations>,
}

impl BatchActivations {
    pub fn new(topology: &Topology, batch_size: usize) -> BatchActivations {
        BatchActivations {
            slots: (0..batch_size).map(|_| SampleActivations::new(topology)).collect(),
        }
    }

    pub fn slot(&self, index: usize) -> &SampleActivations {
        &self.slots[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut SampleActivations {
        &mut self.slots[index]
    }

    /// The first `len` slots, i.e. the ones filled for the current batch.
    pub fn filled(&self, len: usize) -> &[SampleActivations] {
        &self.slots[..len]
    }
}

/// Runs one sample through every transition, overwriting `acts`, and
/// returns the output layer.
pub fn forward<'a>(
    topology: &Topology,
    weights: &WeightStore,
    input: &[f64],
    acts: &'a mut SampleActivations,
) -> Result<&'a [f64]> {
    if input.len() != topology.input_size() {
        return Err(NetError::shape("input", topology.input_size(), input.len()));
    }

    acts.neurons[0].copy_from_slice(input);
    acts.pre_neurons[0].copy_from_slice(input);

    for t in 0..topology.transitions() {
        let (src_layers, dst_layers) = acts.neurons.split_at_mut(t + 1);
        let src = &src_layers[t];
        let dst = &mut dst_layers[0];

        feed_transition(src, weights.connections(t), dst);

        let activator = if topology.is_hidden_transition(t) {
            for (v, b) in dst.iter_mut().zip(weights.bias(t).unwrap_or_default()) {
                *v += b;
            }
            ActivationFunction::ScaledSoftsign
        } else {
            ActivationFunction::Identity
        };

        normalize(dst);
        acts.pre_neurons[t + 1].copy_from_slice(dst);
        for v in dst.iter_mut() {
            *v = activator.function(*v);
        }
    }

    Ok(acts.output())
}

/// `dst[k] = sum_j src[j] * matrix[j * dst.len() + k]`
fn feed_transition(src: &[f64], matrix: &[f64], dst: &mut [f64]) {
    let width = dst.len();
    dst.iter_mut().for_each(|v| *v = 0.0);
    for (j, &a) in src.iter().enumerate() {
        let row = &matrix[j * width..(j + 1) * width];
        for (v, w) in dst.iter_mut().zip(row) {
            *v += a * w;
        }
    }
}
