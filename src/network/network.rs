use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::layers::dense::{forward, SampleActivations};
use crate::loss::mse::MseLoss;
use crate::math::weights::WeightStore;
use crate::network::persist::{read_model, write_model};
use crate::network::topology::Topology;

/// A dense network: topology plus its weights and hidden-layer biases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub topology: Topology,
    pub weights: WeightStore,
}

impl Network {
    /// Builds a network with uniform random weights in `[-1, 1]`.
    pub fn new(sizes: Vec<usize>) -> Result<Network> {
        let topology = Topology::new(sizes)?;
        let weights = WeightStore::random(&topology);
        Ok(Network { topology, weights })
    }

    /// Like `new`, but reproducible.
    pub fn with_seed(sizes: Vec<usize>, seed: u64) -> Result<Network> {
        let topology = Topology::new(sizes)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = WeightStore::random_with(&topology, &mut rng);
        Ok(Network { topology, weights })
    }

    pub fn from_parts(
        topology: Topology,
        connections: Vec<Vec<f64>>,
        biases: Vec<Vec<f64>>,
    ) -> Result<Network> {
        let weights = WeightStore::from_parts(&topology, connections, biases)?;
        Ok(Network { topology, weights })
    }

    /// Single-sample inference on a scratch buffer.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut acts = SampleActivations::new(&self.topology);
        let out = forward(&self.topology, &self.weights, input, &mut acts)?;
        Ok(out.to_vec())
    }

    /// Mean squared error of the prediction for `input` against `expected`.
    pub fn error(&self, input: &[f64], expected: &[f64]) -> Result<f64> {
        let out = self.forward(input)?;
        if expected.len() != out.len() {
            return Err(NetError::shape("expected output", out.len(), expected.len()));
        }
        Ok(MseLoss::loss(&out, expected))
    }

    /// Writes the plain-text model format (see `network::persist`).
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        write_model(BufWriter::new(file), &self.topology, &self.weights)
    }

    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let (topology, weights) = read_model(BufReader::new(file))?;
        Ok(Network { topology, weights })
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`, re-checking weight shapes against the topology.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let raw: Network = serde_json::from_reader(reader)?;
        Network::from_parts(
            raw.topology,
            raw.weights.all_connections().to_vec(),
            raw.weights.all_biases().to_vec(),
        )
    }

    /// Saves as JSON when the extension is `.json`, plain text otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if is_json(path.as_ref()) {
            self.save_json(path)
        } else {
            self.save_text(path)
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        if is_json(path.as_ref()) {
            Network::load_json(path)
        } else {
            Network::load_text(path)
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
