pub mod backprop;
pub mod batch_stats;
pub mod batching;
pub mod parallel;
pub mod train_config;
pub mod trainer;

pub use batch_stats::BatchStats;
pub use batching::{batch_windows, TailPolicy};
pub use train_config::TrainConfig;
pub use trainer::{train, TrainSummary};
