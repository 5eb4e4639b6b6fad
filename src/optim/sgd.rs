use tracing::debug;

use crate::error::{NetError, Result};
use crate::math::weights::WeightStore;
use crate::optim::accumulator::GradientAccumulator;

/// Plain gradient descent.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// Applies `w -= lr * (sum / samples)` to every weight and bias, then
    /// clears the accumulator.
    ///
    /// The learning rate is applied here and nowhere else. With nothing
    /// accumulated this is a no-op.
    pub fn step(&self, weights: &mut WeightStore, grads: &mut GradientAccumulator) {
        if grads.is_empty() {
            return;
        }
        let scale = self.learning_rate / grads.samples() as f64;
        debug!(samples = grads.samples(), scale, "applying gradient update");
        weights.sub_scaled(grads.sums(), scale);
        grads.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::topology::Topology;

    #[test]
    fn averages_then_scales_once() {
        let topology = Topology::new(vec![1, 1, 1]).unwrap();
        let mut weights = WeightStore::from_parts(&topology, vec![vec![1.0], vec![1.0]], vec![vec![0.0]]).unwrap();
        let mut grads = GradientAccumulator::new(&topology);
        grads.sums_mut().connections_mut(0)[0] = 4.0;
        grads.sums_mut().bias_mut(0).unwrap()[0] = -2.0;
        grads.record_sample();
        grads.record_sample();

        Sgd::new(0.5).unwrap().step(&mut weights, &mut grads);
        assert_eq!(weights.connections(0), &[0.0]);
        assert_eq!(weights.connections(1), &[1.0]);
        assert_eq!(weights.bias(0), Some(&[0.5][..]));
        assert_eq!(grads.total(), 0.0);
        assert!(grads.is_empty());
    }

    #[test]
    fn step_without_contributions_is_a_noop() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let mut weights = WeightStore::from_parts(&topology, vec![vec![0.3, -0.2]], vec![]).unwrap();
        let before = weights.clone();
        let mut grads = GradientAccumulator::new(&topology);
        Sgd::new(0.1).unwrap().step(&mut weights, &mut grads);
        assert_eq!(weights, before);
    }

    #[test]
    fn rejects_bad_learning_rates() {
        assert!(Sgd::new(0.0).is_err());
        assert!(Sgd::new(f64::NAN).is_err());
    }
}
