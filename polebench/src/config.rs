//! Run configuration files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use harness::EvaluationConfig;
use physics::CartPoleConfig;
use serde::{Deserialize, Serialize};

/// Everything that fixes a run: physics constants and evaluation protocol.
///
/// Missing sections and fields take their defaults, so `{}` is a valid file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub physics: CartPoleConfig,
    pub evaluation: EvaluationConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overrides {
    pub episodes: Option<usize>,
    pub max_steps: Option<u64>,
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Load from a JSON file, or use defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading run configuration {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing run configuration {}", path.display()))
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(episodes) = overrides.episodes {
            self.evaluation.num_episodes = episodes;
        }
        if let Some(max_steps) = overrides.max_steps {
            self.evaluation.max_steps_per_episode = max_steps;
        }
        if let Some(seed) = overrides.seed {
            self.evaluation.seed = seed;
        }
        self
    }
}
