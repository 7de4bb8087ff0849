//! Feed-forward networks as evaluation policies.
//!
//! Networks are produced elsewhere (typically by a neuroevolution run) and
//! loaded here from JSON. Only inference is supported.
//!
//! The format is strictly layered: every layer reads only the output of the
//! layer before it, and each node sums its weighted inputs plus a bias. NEAT
//! genomes with connections that skip layers, per-node `response`
//! multipliers or aggregations other than a sum cannot be expressed in general.
//! A response can be folded into the node's incoming weights before export;
//! for the rest, the network type has to implement [`Policy`] itself.

use physics::Observation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PolicyError;
use crate::policy::Policy;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("layer {layer}: {what} has {got} entries, expected {expected}")]
    Shape {
        layer: usize,
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("layer {layer} takes {got} inputs but the previous layer produces {expected}")]
    Chain { layer: usize, expected: usize, got: usize },
    #[error("layer {layer} has a non-finite parameter")]
    NonFinite { layer: usize },
    #[error("network has no layers")]
    Empty,
    #[error("failed to parse network: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Element-wise activation applied after a layer's affine map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Identity,
    Sigmoid,
    /// `1 / (1 + e^(-5z))` with `z` clamped to `[-60, 60]`.
    SteepenedSigmoid,
    Tanh,
    Relu,
}

impl Activation {
    #[must_use]
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Identity => z,
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Activation::SteepenedSigmoid => {
                let z = (5.0 * z).clamp(-60.0, 60.0);
                1.0 / (1.0 + (-z).exp())
            }
            Activation::Tanh => z.tanh(),
            Activation::Relu => z.max(0.0),
        }
    }
}

/// A fully connected layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
    /// Row-major `out_dim x in_dim` weight matrix.
    pub weights: Vec<f64>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl Dense {
    #[must_use]
    pub fn new(weights: Vec<f64>, bias: Vec<f64>, in_dim: usize, out_dim: usize, activation: Activation) -> Self {
        Self { in_dim, out_dim, weights, bias, activation }
    }

    /// Performs the forward pass through the layer.
    #[must_use]
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .chunks_exact(self.in_dim)
            .zip(&self.bias)
            .map(|(row, b)| {
                let sum = row.iter().zip(x).fold(*b, |acc, (w, v)| acc + w * v);
                self.activation.apply(sum)
            })
            .collect()
    }

    fn check(&self, layer: usize) -> Result<(), NetworkError> {
        let shape = |what, expected, got| NetworkError::Shape { layer, what, expected, got };
        if self.in_dim == 0 {
            return Err(shape("in_dim", 1, 0));
        }
        if self.weights.len() != self.in_dim * self.out_dim {
            return Err(shape("weights", self.in_dim * self.out_dim, self.weights.len()));
        }
        if self.bias.len() != self.out_dim {
            return Err(shape("bias", self.out_dim, self.bias.len()));
        }
        if self.weights.iter().chain(&self.bias).all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(NetworkError::NonFinite { layer })
        }
    }
}

/// A stack of dense layers evaluated in order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedForward {
    layers: Vec<Dense>,
}

impl FeedForward {
    /// # Errors
    ///
    /// Returns a [`NetworkError`] if the layers are empty, mis-shaped, or do
    /// not chain.
    pub fn new(layers: Vec<Dense>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::Empty);
        }
        for (i, layer) in layers.iter().enumerate() {
            layer.check(i)?;
            if i > 0 && layers[i - 1].out_dim != layer.in_dim {
                return Err(NetworkError::Chain {
                    layer: i,
                    expected: layers[i - 1].out_dim,
                    got: layer.in_dim,
                });
            }
        }
        Ok(Self { layers })
    }

    /// Parse `{ "layers": [...] }` and validate it.
    ///
    /// # Errors
    ///
    /// Returns a [`NetworkError`] for malformed JSON or an invalid network.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        #[derive(Deserialize)]
        struct Raw {
            layers: Vec<Dense>,
        }
        let raw: Raw = serde_json::from_str(json)?;
        Self::new(raw.layers)
    }

    #[must_use]
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.layers[0].in_dim
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].out_dim
    }

    #[must_use]
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        self.layers.iter().fold(x.to_vec(), |out, layer| layer.forward(&out))
    }
}

impl Policy for FeedForward {
    fn activate(&self, observation: &Observation) -> Result<Vec<f64>, PolicyError> {
        if self.input_size() != observation.len() {
            return Err(PolicyError::InputArity {
                expected: self.input_size(),
                got: observation.len(),
            });
        }
        Ok(self.forward(observation))
    }
}
