use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Ordered layer widths, input first and output last.
///
/// A topology with `n + 1` layers has `n` transitions; transition `i`
/// connects layer `i` to layer `i + 1`. Layers `1..n` are hidden and carry
/// a bias vector and the bounded activation; the output layer carries
/// neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    pub fn new(sizes: Vec<usize>) -> Result<Topology> {
        if sizes.len() < 2 {
            return Err(NetError::InvalidTopology(format!(
                "need at least an input and an output layer, got {} layer(s)",
                sizes.len()
            )));
        }
        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(NetError::InvalidTopology(format!("layer {pos} has zero width")));
        }
        Ok(Topology { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of weight matrices.
    pub fn transitions(&self) -> usize {
        self.sizes.len() - 1
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Whether the destination of `transition` is a hidden layer.
    pub fn is_hidden_transition(&self, transition: usize) -> bool {
        transition + 1 < self.transitions()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = NetError;

    fn try_from(sizes: Vec<usize>) -> Result<Topology> {
        Topology::new(sizes)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.sizes
    }
}
