pub mod activation;

pub use activation::{normalize, range_normalize, ActivationFunction, DerivativeMode};
