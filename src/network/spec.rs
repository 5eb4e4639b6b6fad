use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::topology::Topology;
use crate::train::train_config::TrainConfig;

/// A fully serializable description of a training run: architecture plus
/// hyperparameters.
///
/// ```json
/// {
///   "name": "patterns",
///   "layers": [16, 8, 6, 4],
///   "training": { "epochs": 1000, "batch_size": 4, "learning_rate": 0.005, "workers": 5 }
/// }
/// ```
///
/// Missing `training` fields take their `TrainConfig::default()` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the default model file stem.
    pub name: String,
    pub layers: Topology,
    #[serde(default)]
    pub training: TrainConfig,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::batching::TailPolicy;

    #[test]
    fn parses_with_partial_training_section() {
        let spec: NetworkSpec = serde_json::from_str(
            r#"{ "name": "xor", "layers": [2, 3, 1], "training": { "workers": 2, "tail_policy": "full_window" } }"#,
        )
        .unwrap();
        assert_eq!(spec.layers.sizes(), &[2, 3, 1]);
        assert_eq!(spec.training.workers, 2);
        assert_eq!(spec.training.tail_policy, TailPolicy::FullWindow);
        assert_eq!(spec.training.epochs, 1000);
    }

    #[test]
    fn rejects_invalid_layers() {
        assert!(serde_json::from_str::<NetworkSpec>(r#"{ "name": "x", "layers": [2] }"#).is_err());
    }
}
