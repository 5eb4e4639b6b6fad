use crate::math::weights::WeightStore;
use crate::network::topology::Topology;

/// Sum of raw (not learning-rate scaled) per-sample gradients since the last
/// update, plus the number of samples that contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientAccumulator {
    sums: WeightStore,
    samples: usize,
}

impl GradientAccumulator {
    pub fn new(topology: &Topology) -> GradientAccumulator {
        GradientAccumulator {
            sums: WeightStore::zeros(topology),
            samples: 0,
        }
    }

    pub fn sums(&self) -> &WeightStore {
        &self.sums
    }

    pub(crate) fn sums_mut(&mut self) -> &mut WeightStore {
        &mut self.sums
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Marks one sample's contributions as added.
    pub(crate) fn record_sample(&mut self) {
        self.samples += 1;
    }

    /// Adds another accumulator of the same shape into this one.
    pub fn merge(&mut self, other: &GradientAccumulator) {
        self.sums.add_assign(&other.sums);
        self.samples += other.samples;
    }

    /// Sum of absolute gradient values; zero right after `clear`.
    pub fn total(&self) -> f64 {
        self.sums.abs_total()
    }

    pub fn clear(&mut self) {
        self.sums.fill_zero();
        self.samples = 0;
    }
}
