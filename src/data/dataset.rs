use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::network::topology::Topology;

/// Paired input / expected-output vectors.
///
/// Every input has the same width, as does every target. JSON form:
/// `{ "inputs": [[...], ...], "targets": [[...], ...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawDataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = NetError;

    fn try_from(raw: RawDataset) -> Result<Dataset> {
        Dataset::new(raw.inputs, raw.targets)
    }
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        if inputs.is_empty() {
            return Err(NetError::InvalidData("dataset must not be empty".to_owned()));
        }
        if inputs.len() != targets.len() {
            return Err(NetError::InvalidData(format!(
                "{} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        check_uniform("input", &inputs)?;
        check_uniform("target", &targets)?;
        Ok(Dataset { inputs, targets })
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Checks input and target widths against a network topology.
    pub fn validate_for(&self, topology: &Topology) -> Result<()> {
        if self.input_width() != topology.input_size() {
            return Err(NetError::shape("dataset input", topology.input_size(), self.input_width()));
        }
        if self.target_width() != topology.output_size() {
            return Err(NetError::shape("dataset target", topology.output_size(), self.target_width()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Vec<f64>] {
        &self.targets
    }

    pub fn input_width(&self) -> usize {
        self.inputs[0].len()
    }

    pub fn target_width(&self) -> usize {
        self.targets[0].len()
    }
}

fn check_uniform(what: &str, rows: &[Vec<f64>]) -> Result<()> {
    let width = rows[0].len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(NetError::shape(format!("{what} {i}"), width, row.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_counts_and_ragged_rows() {
        assert!(Dataset::new(vec![], vec![]).is_err());
        assert!(Dataset::new(vec![vec![1.0]], vec![]).is_err());
        assert!(Dataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![vec![0.0], vec![1.0]]).is_err());
    }

    #[test]
    fn validates_against_topology() {
        let data = Dataset::new(vec![vec![1.0, 1.0]], vec![vec![1.0]]).unwrap();
        data.validate_for(&Topology::new(vec![2, 1]).unwrap()).unwrap();
        assert!(data.validate_for(&Topology::new(vec![3, 1]).unwrap()).is_err());
        assert!(data.validate_for(&Topology::new(vec![2, 2]).unwrap()).is_err());
    }

    #[test]
    fn json_goes_through_validation() {
        let ok: Dataset = serde_json::from_str(r#"{"inputs": [[0, 1]], "targets": [[1]]}"#).unwrap();
        assert_eq!(ok.len(), 1);
        let bad = serde_json::from_str::<Dataset>(r#"{"inputs": [[0, 1]], "targets": []}"#);
        assert!(bad.is_err());
    }
}
