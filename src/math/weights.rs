use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::network::topology::Topology;

/// Flat per-transition weight matrices plus one bias vector per hidden layer.
///
/// Matrix `i` connects layer `i` to layer `i + 1` and is stored row-major by
/// source neuron: `weight(src = j, dst = k) = connections[i][j * L[i+1] + k]`.
/// `biases[i]` belongs to the destination layer of transition `i` and exists
/// only for hidden destinations, so there is one fewer bias vector than
/// matrices.
///
/// The same shape doubles as gradient storage in `GradientAccumulator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStore {
    connections: Vec<Vec<f64>>,
    biases: Vec<Vec<f64>>,
}

impl WeightStore {
    pub fn zeros(topology: &Topology) -> WeightStore {
        let sizes = topology.sizes();
        let connections = (0..topology.transitions())
            .map(|i| vec![0.0; sizes[i] * sizes[i + 1]])
            .collect();
        let biases = (0..topology.transitions() - 1)
            .map(|i| vec![0.0; sizes[i + 1]])
            .collect();
        WeightStore { connections, biases }
    }

    /// Uniform weights in `[-1, 1]` from the thread RNG; biases start at zero.
    pub fn random(topology: &Topology) -> WeightStore {
        let mut rng = rand::thread_rng();
        WeightStore::random_with(topology, &mut rng)
    }

    pub fn random_with<R: Rng>(topology: &Topology, rng: &mut R) -> WeightStore {
        let mut res = WeightStore::zeros(topology);
        for matrix in &mut res.connections {
            for w in matrix.iter_mut() {
                *w = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }
        res
    }

    /// Builds a store from explicit values, checking every length against
    /// `topology`.
    pub fn from_parts(
        topology: &Topology,
        connections: Vec<Vec<f64>>,
        biases: Vec<Vec<f64>>,
    ) -> Result<WeightStore> {
        let sizes = topology.sizes();
        if connections.len() != topology.transitions() {
            return Err(NetError::shape("weight matrices", topology.transitions(), connections.len()));
        }
        if biases.len() != topology.transitions() - 1 {
            return Err(NetError::shape("bias vectors", topology.transitions() - 1, biases.len()));
        }
        for (i, matrix) in connections.iter().enumerate() {
            let expected = sizes[i] * sizes[i + 1];
            if matrix.len() != expected {
                return Err(NetError::shape(format!("weight matrix {i}"), expected, matrix.len()));
            }
        }
        for (i, bias) in biases.iter().enumerate() {
            if bias.len() != sizes[i + 1] {
                return Err(NetError::shape(format!("bias vector {i}"), sizes[i + 1], bias.len()));
            }
        }
        Ok(WeightStore { connections, biases })
    }

    pub fn transitions(&self) -> usize {
        self.connections.len()
    }

    pub fn connections(&self, transition: usize) -> &[f64] {
        &self.connections[transition]
    }

    pub fn connections_mut(&mut self, transition: usize) -> &mut [f64] {
        &mut self.connections[transition]
    }

    /// Bias vector of the hidden destination layer of `transition`, or `None`
    /// for the output transition.
    pub fn bias(&self, transition: usize) -> Option<&[f64]> {
        self.biases.get(transition).map(Vec::as_slice)
    }

    pub fn bias_mut(&mut self, transition: usize) -> Option<&mut [f64]> {
        self.biases.get_mut(transition).map(Vec::as_mut_slice)
    }

    pub fn all_connections(&self) -> &[Vec<f64>] {
        &self.connections
    }

    pub fn all_biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    /// `self += other`, element-wise. Shapes must match.
    pub fn add_assign(&mut self, other: &WeightStore) {
        assert!(self.same_shape(other), "weight stores are of incorrect sizes");
        for (dst, src) in self.connections.iter_mut().zip(&other.connections) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
        for (dst, src) in self.biases.iter_mut().zip(&other.biases) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
    }

    /// `self -= scale * other`, element-wise. Shapes must match.
    pub fn sub_scaled(&mut self, other: &WeightStore, scale: f64) {
        assert!(self.same_shape(other), "weight stores are of incorrect sizes");
        for (dst, src) in self.connections.iter_mut().zip(&other.connections) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d -= scale * s;
            }
        }
        for (dst, src) in self.biases.iter_mut().zip(&other.biases) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d -= scale * s;
            }
        }
    }

    /// Whether every matrix and bias vector has the same length in both.
    pub fn same_shape(&self, other: &WeightStore) -> bool {
        fn lens(groups: &[Vec<f64>]) -> impl Iterator<Item = usize> + '_ {
            groups.iter().map(Vec::len)
        }
        self.connections.len() == other.connections.len()
            && self.biases.len() == other.biases.len()
            && lens(&self.connections).eq(lens(&other.connections))
            && lens(&self.biases).eq(lens(&other.biases))
    }

    pub fn fill_zero(&mut self) {
        for v in self.connections.iter_mut().chain(self.biases.iter_mut()) {
            v.iter_mut().for_each(|x| *x = 0.0);
        }
    }

    /// Sum of absolute values over every weight and bias.
    pub fn abs_total(&self) -> f64 {
        self.connections
            .iter()
            .chain(self.biases.iter())
            .flat_map(|v| v.iter())
            .map(|x| x.abs())
            .sum()
    }
}
