pub mod accumulator;
pub mod sgd;

pub use accumulator::GradientAccumulator;
pub use sgd::Sgd;
