//! CartPole simulator for policy evaluation
//!
//! Owns the continuous state of one cart-pole, advances it one fixed time
//! step at a time, and reports when the cart or pole has left the balanced
//! region. Each simulator carries its own seeded random stream so that
//! resets are reproducible and simulators can live on separate threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{CartPoleConfig, ResetStrategy};
use crate::error::PhysicsError;
use crate::integrator::{Accelerations, Dynamics};
use crate::types::{Observation, SimulationState};

/// A single cart-pole system.
pub struct CartPole {
    config: CartPoleConfig,
    dynamics: Dynamics,
    state: SimulationState,
    /// Accelerations from the previous step, zeroed on reset.
    memory: Accelerations,
    rng: StdRng,
}

impl CartPole {
    /// Create a simulator seeded with `0`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: CartPoleConfig) -> Result<Self, PhysicsError> {
        Self::with_seed(config, 0)
    }

    /// Create a simulator whose resets draw from a stream seeded with `seed`.
    ///
    /// The simulator starts in a freshly reset state.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if the configuration is invalid.
    pub fn with_seed(config: CartPoleConfig, seed: u64) -> Result<Self, PhysicsError> {
        config.validate()?;
        let mut cartpole = Self {
            dynamics: config.dynamics(),
            config,
            state: SimulationState::UPRIGHT,
            memory: Accelerations::default(),
            rng: StdRng::seed_from_u64(seed),
        };
        cartpole.reset();
        Ok(cartpole)
    }

    #[must_use]
    pub fn config(&self) -> &CartPoleConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Overwrite the state and clear the integrator's memory.
    pub fn set_state(&mut self, state: SimulationState) {
        self.state = state;
        self.memory = Accelerations::default();
    }

    /// Start a new episode according to the configured [`ResetStrategy`].
    pub fn reset(&mut self) -> SimulationState {
        let state = match &self.config.reset {
            ResetStrategy::Fixed { state } => *state,
            ResetStrategy::Uniform {
                position_fraction,
                angle_fraction,
                velocity_spread,
                angular_velocity_spread,
            } => {
                let bounds = &self.config.bounds;
                let x = symmetric(&mut self.rng, position_fraction * bounds.position_limit);
                let theta = symmetric(&mut self.rng, angle_fraction * bounds.angle_limit_radians);
                let dx = symmetric(&mut self.rng, *velocity_spread);
                let dtheta = symmetric(&mut self.rng, *angular_velocity_spread);
                SimulationState::new(x, dx, theta, dtheta)
            }
        };
        self.set_state(state);
        state
    }

    /// Scaled view of the current state for a policy.
    #[must_use]
    pub fn observe(&self) -> Observation {
        self.config.observation.apply(&self.config.bounds, &self.state)
    }

    /// Apply `force` (newtons, positive toward `+x`) for one time step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NonFiniteState`] if the force is not finite or
    /// the integration produced NaN or infinity.
    pub fn step(&mut self, force: f64) -> Result<(), PhysicsError> {
        if !force.is_finite() {
            return Err(PhysicsError::NonFiniteState { force, state: self.state });
        }
        self.config.integrator.advance(
            &self.dynamics,
            &mut self.state,
            &mut self.memory,
            force,
            self.config.time_step,
        );
        if self.state.is_finite() {
            Ok(())
        } else {
            Err(PhysicsError::NonFiniteState { force, state: self.state })
        }
    }

    /// `true` once `|x| >= position_limit` or `|theta| >= angle_limit_radians`.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.config.bounds.violated_by(&self.state)
    }
}

fn symmetric(rng: &mut StdRng, half_width: f64) -> f64 {
    if half_width > 0.0 {
        rng.gen_range(-half_width..=half_width)
    } else {
        0.0
    }
}
