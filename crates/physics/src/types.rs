use serde::{Deserialize, Serialize};

/// Number of scalars in an [`Observation`].
pub const OBSERVATION_SIZE: usize = 4;

/// Normalized policy input: scaled `[x, dx, theta, dtheta]`.
pub type Observation = [f64; OBSERVATION_SIZE];

/// Continuous state of the cart-pole.
///
/// `theta` is measured in radians from upright, positive in the direction of
/// positive `x`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub x: f64,
    pub dx: f64,
    pub theta: f64,
    pub dtheta: f64,
}

impl SimulationState {
    #[must_use]
    pub const fn new(x: f64, dx: f64, theta: f64, dtheta: f64) -> Self {
        Self { x, dx, theta, dtheta }
    }

    /// Upright pole, cart at the origin, everything at rest.
    pub const UPRIGHT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.dx.is_finite() && self.theta.is_finite() && self.dtheta.is_finite()
    }
}

/// Failure region of the track and the pole.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    /// Maximum `|x|` in meters.
    pub position_limit: f64,
    /// Maximum `|theta|` in radians.
    pub angle_limit_radians: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            position_limit: 2.4,
            angle_limit_radians: 45.0 * std::f64::consts::PI / 180.0,
        }
    }
}

impl Bounds {
    /// Inclusive on the failed side.
    #[must_use]
    pub fn violated_by(&self, state: &SimulationState) -> bool {
        state.x.abs() >= self.position_limit || state.theta.abs() >= self.angle_limit_radians
    }
}
