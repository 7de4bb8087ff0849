//! Configuration for a [`CartPole`](crate::CartPole) simulator.
//!
//! Every constant that influences a trajectory lives here so that two runs
//! with equal configurations and seeds are identical.

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::integrator::{Dynamics, Integrator};
use crate::types::{Bounds, Observation, SimulationState};

/// Configuration for a cart-pole simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartPoleConfig {
    /// Gravitational acceleration in m/s², positive downward.
    pub gravity: f64,
    /// Cart mass in kg
    pub cart_mass: f64,
    /// Pole mass in kg
    pub pole_mass: f64,
    /// Distance from the hinge to the pole's center of mass, in meters.
    pub pole_half_length: f64,
    /// Physical time covered by one `step`, in seconds.
    pub time_step: f64,
    pub bounds: Bounds,
    pub integrator: Integrator,
    pub reset: ResetStrategy,
    pub observation: ObservationScaling,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_half_length: 0.5,
            time_step: 0.01,
            bounds: Bounds::default(),
            integrator: Integrator::default(),
            reset: ResetStrategy::default(),
            observation: ObservationScaling::default(),
        }
    }
}

impl CartPoleConfig {
    #[must_use]
    pub fn dynamics(&self) -> Dynamics {
        Dynamics {
            gravity: self.gravity,
            cart_mass: self.cart_mass,
            pole_mass: self.pole_mass,
            pole_half_length: self.pole_half_length,
        }
    }

    /// Check every constant before any simulation runs.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::invalid("gravity", self.gravity, "must be finite"));
        }
        positive("cart_mass", self.cart_mass)?;
        positive("pole_mass", self.pole_mass)?;
        positive("pole_half_length", self.pole_half_length)?;
        positive("time_step", self.time_step)?;
        positive("bounds.position_limit", self.bounds.position_limit)?;
        positive("bounds.angle_limit_radians", self.bounds.angle_limit_radians)?;
        self.reset.validate(&self.bounds)?;
        self.observation.validate(&self.bounds)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), PhysicsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::invalid(field, value, "must be finite and strictly positive"))
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), PhysicsError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(PhysicsError::invalid(field, value, "must lie in [0, 1)"))
    }
}

/// A symmetric sampling half-width; the full interval `2 * value` must be finite.
fn spread(field: &'static str, value: f64) -> Result<(), PhysicsError> {
    if value >= 0.0 && (2.0 * value).is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::invalid(field, value, "must be non-negative with a finite interval width"))
    }
}

/// How `reset` chooses the initial state of an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResetStrategy {
    /// Every episode starts from the same state.
    Fixed { state: SimulationState },
    /// Each component is drawn independently and uniformly from a symmetric
    /// interval, in the order `x`, `theta`, `dx`, `dtheta`.
    Uniform {
        /// Half-width of the `x` interval as a fraction of `position_limit`.
        position_fraction: f64,
        /// Half-width of the `theta` interval as a fraction of `angle_limit_radians`.
        angle_fraction: f64,
        /// Half-width of the `dx` interval in m/s.
        velocity_spread: f64,
        /// Half-width of the `dtheta` interval in rad/s.
        angular_velocity_spread: f64,
    },
}

impl Default for ResetStrategy {
    fn default() -> Self {
        ResetStrategy::Uniform {
            position_fraction: 0.5,
            angle_fraction: 0.5,
            velocity_spread: 1.0,
            angular_velocity_spread: 1.0,
        }
    }
}

impl ResetStrategy {
    fn validate(&self, bounds: &Bounds) -> Result<(), PhysicsError> {
        match self {
            ResetStrategy::Fixed { state } => {
                if !state.is_finite() {
                    return Err(PhysicsError::invalid("reset.state", f64::NAN, "must be finite"));
                }
                if state.x.abs() >= bounds.position_limit {
                    return Err(PhysicsError::invalid("reset.state.x", state.x, "must lie strictly inside the position limit"));
                }
                if state.theta.abs() >= bounds.angle_limit_radians {
                    return Err(PhysicsError::invalid("reset.state.theta", state.theta, "must lie strictly inside the angle limit"));
                }
                Ok(())
            }
            ResetStrategy::Uniform {
                position_fraction,
                angle_fraction,
                velocity_spread,
                angular_velocity_spread,
            } => {
                fraction("reset.position_fraction", *position_fraction)?;
                fraction("reset.angle_fraction", *angle_fraction)?;
                spread("reset.position_fraction", position_fraction * bounds.position_limit)?;
                spread("reset.angle_fraction", angle_fraction * bounds.angle_limit_radians)?;
                spread("reset.velocity_spread", *velocity_spread)?;
                spread("reset.angular_velocity_spread", *angular_velocity_spread)
            }
        }
    }
}

/// One affine rescaling: `gain * (value + offset) / divisor`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineScale {
    pub gain: f64,
    pub offset: f64,
    pub divisor: f64,
}

impl AffineScale {
    #[must_use]
    pub const fn new(gain: f64, offset: f64, divisor: f64) -> Self {
        Self { gain, offset, divisor }
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        self.gain * (value + self.offset) / self.divisor
    }

    fn validate(&self, field: &'static str) -> Result<(), PhysicsError> {
        for value in [self.gain, self.offset, self.divisor] {
            if !value.is_finite() {
                return Err(PhysicsError::invalid(field, value, "scaling constants must be finite"));
            }
        }
        if self.divisor == 0.0 {
            return Err(PhysicsError::invalid(field, self.divisor, "divisor must be non-zero"));
        }
        Ok(())
    }
}

/// Maps the simulation state into the policy's input range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationScaling {
    /// Position and angle are mapped from `[-limit, limit]` onto `[0, 1]`;
    /// velocities use fixed affine constants.
    LimitRelative {
        velocity: AffineScale,
        angular_velocity: AffineScale,
    },
    /// Explicit constants for `[x, dx, theta, dtheta]`.
    Custom { scales: [AffineScale; 4] },
}

impl Default for ObservationScaling {
    fn default() -> Self {
        ObservationScaling::LimitRelative {
            velocity: AffineScale::new(1.0, 0.75, 1.5),
            angular_velocity: AffineScale::new(1.0, 1.0, 2.0),
        }
    }
}

impl ObservationScaling {
    /// The four per-component scales in effect for `bounds`.
    #[must_use]
    pub fn scales(&self, bounds: &Bounds) -> [AffineScale; 4] {
        match self {
            ObservationScaling::LimitRelative { velocity, angular_velocity } => [
                AffineScale::new(0.5, bounds.position_limit, bounds.position_limit),
                *velocity,
                AffineScale::new(0.5, bounds.angle_limit_radians, bounds.angle_limit_radians),
                *angular_velocity,
            ],
            ObservationScaling::Custom { scales } => *scales,
        }
    }

    #[must_use]
    pub fn apply(&self, bounds: &Bounds, state: &SimulationState) -> Observation {
        let [x, dx, theta, dtheta] = self.scales(bounds);
        [
            x.apply(state.x),
            dx.apply(state.dx),
            theta.apply(state.theta),
            dtheta.apply(state.dtheta),
        ]
    }

    fn validate(&self, bounds: &Bounds) -> Result<(), PhysicsError> {
        const FIELDS: [&str; 4] = [
            "observation.x",
            "observation.dx",
            "observation.theta",
            "observation.dtheta",
        ];
        for (scale, field) in self.scales(bounds).iter().zip(FIELDS) {
            scale.validate(field)?;
        }
        Ok(())
    }
}
