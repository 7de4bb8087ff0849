//! Translation of a policy's action signal into a cart force.
//!
//! This mapping is the only channel through which a policy affects the
//! physical system; it is fixed for a run and validated up front.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// How the first action scalar becomes a force in newtons.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActuatorMapping {
    /// Bang-bang control: `above` when the action exceeds `threshold`,
    /// otherwise `below`.
    Threshold { threshold: f64, below: f64, above: f64 },
    /// Linear interpolation from `[input_min, input_max]` onto
    /// `[force_min, force_max]`, clamped at both ends.
    LinearClamped {
        input_min: f64,
        input_max: f64,
        force_min: f64,
        force_max: f64,
    },
}

impl Default for ActuatorMapping {
    fn default() -> Self {
        ActuatorMapping::Threshold { threshold: 0.5, below: -10.0, above: 10.0 }
    }
}

impl ActuatorMapping {
    #[must_use]
    pub fn force(&self, action: f64) -> f64 {
        match *self {
            ActuatorMapping::Threshold { threshold, below, above } => {
                if action > threshold {
                    above
                } else {
                    below
                }
            }
            ActuatorMapping::LinearClamped { input_min, input_max, force_min, force_max } => {
                let t = ((action - input_min) / (input_max - input_min)).clamp(0.0, 1.0);
                force_min + t * (force_max - force_min)
            }
        }
    }

    fn validate(&self) -> Result<(), EvalError> {
        let constants = match *self {
            ActuatorMapping::Threshold { threshold, below, above } => {
                if below == above {
                    return Err(EvalError::InvalidConfig(format!(
                        "threshold actuator needs two distinct forces, got {below} twice"
                    )));
                }
                vec![threshold, below, above]
            }
            ActuatorMapping::LinearClamped { input_min, input_max, force_min, force_max } => {
                if input_min >= input_max {
                    return Err(EvalError::InvalidConfig(format!(
                        "linear actuator input range [{input_min}, {input_max}] is empty"
                    )));
                }
                if !(input_max - input_min).is_finite() || !(force_max - force_min).is_finite() {
                    return Err(EvalError::InvalidConfig(format!(
                        "linear actuator ranges must have a finite width: {self:?}"
                    )));
                }
                vec![input_min, input_max, force_min, force_max]
            }
        };
        if constants.iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(EvalError::InvalidConfig(format!("actuator constants must be finite: {self:?}")))
        }
    }
}

/// Actuator settings for an evaluation run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    pub mapping: ActuatorMapping,
    /// Standard deviation of Gaussian noise added to the action before
    /// mapping. Zero disables noise.
    pub noise_std: f64,
}

impl ActuatorConfig {
    /// # Errors
    ///
    /// [`EvalError::InvalidConfig`] for malformed thresholds, ranges or noise.
    pub fn validate(&self) -> Result<(), EvalError> {
        self.mapping.validate()?;
        if self.noise_std.is_finite() && self.noise_std >= 0.0 {
            Ok(())
        } else {
            Err(EvalError::InvalidConfig(format!(
                "actuator noise_std must be finite and non-negative, got {}",
                self.noise_std
            )))
        }
    }
}

/// A configured actuator with its own noise stream.
pub struct Actuator {
    mapping: ActuatorMapping,
    noise: Option<(Normal<f64>, StdRng)>,
}

impl Actuator {
    /// Build an actuator whose noise (if any) is drawn from a stream seeded
    /// with `seed`.
    ///
    /// # Errors
    ///
    /// [`EvalError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: &ActuatorConfig, seed: u64) -> Result<Self, EvalError> {
        config.validate()?;
        let noise = if config.noise_std > 0.0 {
            let normal = Normal::new(0.0, config.noise_std)
                .map_err(|e| EvalError::InvalidConfig(format!("actuator noise: {e}")))?;
            Some((normal, StdRng::seed_from_u64(seed)))
        } else {
            None
        };
        Ok(Self { mapping: config.mapping, noise })
    }

    /// Force for the first scalar of an action signal, noise included.
    pub fn force(&mut self, mut signal: f64) -> f64 {
        if let Some((normal, rng)) = self.noise.as_mut() {
            signal += normal.sample(rng);
        }
        self.mapping.force(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_picks_one_of_two_forces() {
        let mapping = ActuatorMapping::default();
        assert_eq!(mapping.force(0.9), 10.0);
        assert_eq!(mapping.force(0.5), -10.0);
        assert_eq!(mapping.force(0.1), -10.0);
    }

    #[test]
    fn linear_mapping_is_clamped() {
        let mapping = ActuatorMapping::LinearClamped {
            input_min: -1.0,
            input_max: 1.0,
            force_min: -10.0,
            force_max: 10.0,
        };
        assert_eq!(mapping.force(0.0), 0.0);
        assert_eq!(mapping.force(0.5), 5.0);
        assert_eq!(mapping.force(3.0), 10.0);
        assert_eq!(mapping.force(-3.0), -10.0);
    }

    #[test]
    fn malformed_mappings_are_rejected() {
        let same_forces = ActuatorConfig {
            mapping: ActuatorMapping::Threshold { threshold: 0.5, below: 1.0, above: 1.0 },
            noise_std: 0.0,
        };
        assert!(same_forces.validate().is_err());

        let empty_range = ActuatorConfig {
            mapping: ActuatorMapping::LinearClamped {
                input_min: 1.0,
                input_max: 1.0,
                force_min: -10.0,
                force_max: 10.0,
            },
            noise_std: 0.0,
        };
        assert!(empty_range.validate().is_err());

        let overflowing_range = ActuatorConfig {
            mapping: ActuatorMapping::LinearClamped {
                input_min: -f64::MAX,
                input_max: f64::MAX,
                force_min: -10.0,
                force_max: 10.0,
            },
            noise_std: 0.0,
        };
        assert!(overflowing_range.validate().is_err());

        let overflowing_forces = ActuatorConfig {
            mapping: ActuatorMapping::LinearClamped {
                input_min: -1.0,
                input_max: 1.0,
                force_min: -f64::MAX,
                force_max: f64::MAX,
            },
            noise_std: 0.0,
        };
        assert!(overflowing_forces.validate().is_err());

        let nan_threshold = ActuatorConfig {
            mapping: ActuatorMapping::Threshold { threshold: f64::NAN, below: -1.0, above: 1.0 },
            noise_std: 0.0,
        };
        assert!(nan_threshold.validate().is_err());

        let negative_noise = ActuatorConfig { noise_std: -0.2, ..Default::default() };
        assert!(negative_noise.validate().is_err());
    }

    #[test]
    fn noisy_actuator_is_reproducible_per_seed() {
        let config = ActuatorConfig { noise_std: 0.2, ..Default::default() };
        let forces = |seed| {
            let mut actuator = Actuator::new(&config, seed).unwrap();
            (0..64).map(|_| actuator.force(0.5)).collect::<Vec<_>>()
        };
        assert_eq!(forces(5), forces(5));
        // Noise around the threshold flips the force both ways.
        let sampled = forces(5);
        assert!(sampled.contains(&10.0));
        assert!(sampled.contains(&-10.0));
    }
}
