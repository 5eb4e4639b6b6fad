pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::weights::WeightStore;
pub use activation::activation::{ActivationFunction, DerivativeMode};
pub use layers::dense::{BatchActivations, SampleActivations};
pub use network::{Network, NetworkSpec, Topology};
pub use loss::mse::MseLoss;
pub use optim::{GradientAccumulator, Sgd};
pub use data::dataset::Dataset;
pub use train::{batch_windows, train, BatchStats, TailPolicy, TrainConfig, TrainSummary};
