use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::activation::activation::DerivativeMode;
use crate::error::{NetError, Result};
use crate::train::batch_stats::BatchStats;
use crate::train::batching::TailPolicy;

/// Configuration for a `train` run.
///
/// # Fields
/// - `epochs`        — full passes over the dataset
/// - `batch_size`    — samples per update; also the number of batch slots
/// - `learning_rate` — applied once per update to the averaged gradient
/// - `workers`       — `1` runs forward and backward per sample on the calling
///                     thread; more splits each batch's backward pass across
///                     that many scoped threads
/// - `num_reports`   — how many epochs log their batch errors; must divide
///                     `epochs`
/// - `tail_policy`   — trailing partial batch placement
/// - `derivative`    — value the hidden-layer derivative is evaluated on
/// - `seed`          — optional seed for weight initialization
/// - `progress_tx`   — optional channel receiving a `BatchStats` per report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub workers: usize,
    pub num_reports: usize,
    pub tail_policy: TailPolicy,
    pub derivative: DerivativeMode,
    pub seed: Option<u64>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<BatchStats>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1000,
            batch_size: 4,
            learning_rate: 0.005,
            workers: 5,
            num_reports: 10,
            tail_policy: TailPolicy::default(),
            derivative: DerivativeMode::default(),
            seed: None,
            progress_tx: None,
        }
    }
}

impl TrainConfig {
    /// Creates a sequential `TrainConfig` reporting once, at the last epoch.
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            workers: 1,
            num_reports: 1,
            ..TrainConfig::default()
        }
    }

    /// Rejects settings that would make the loop ill-defined.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetError::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(NetError::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if self.workers == 0 {
            return Err(NetError::InvalidConfig("workers must be > 0".to_owned()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetError::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.num_reports == 0 || self.num_reports > self.epochs {
            return Err(NetError::InvalidConfig(format!(
                "num_reports must be in 1..={}, got {}",
                self.epochs, self.num_reports
            )));
        }
        if self.epochs % self.num_reports != 0 {
            return Err(NetError::InvalidConfig(format!(
                "num_reports ({}) must divide epochs ({})",
                self.num_reports, self.epochs
            )));
        }
        Ok(())
    }

    /// Epochs between reports. Only meaningful after `validate` succeeds.
    pub fn report_interval(&self) -> usize {
        self.epochs / self.num_reports
    }

    pub fn is_report_epoch(&self, epoch: usize) -> bool {
        epoch % self.report_interval() == 0
    }
}
