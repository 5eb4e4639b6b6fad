use serde::{Serialize, Deserialize};

/// One periodic batch-error report emitted by `train`.
///
/// Sent on `TrainConfig::progress_tx` (when set) for every batch of a
/// reporting epoch, alongside the `tracing` log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// 1-based batch number within the epoch.
    pub batch: usize,
    /// Sample window `[window_start, window_end)` this batch covered.
    pub window_start: usize,
    pub window_end: usize,
    /// Mean MSE over the window, measured before the update.
    pub error: f64,
    /// Wall-clock time since the epoch started, in milliseconds.
    pub elapsed_ms: u64,
}
