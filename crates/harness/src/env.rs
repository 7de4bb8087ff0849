use physics::{CartPole, Observation, SimulationState};

use crate::actuator::Actuator;
use crate::error::{EvalError, PolicyError};
use crate::policy::validate_action;

/// Outcome of one environment step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Transition {
    /// Still balanced; the observation of the new state.
    Running(Observation),
    /// The step left the balanced region. No observation is produced for a
    /// failed state.
    Failed,
}

/// Episodic control environment.
///
/// Each call to [`step`] advances the simulation by one action and reports
/// whether the episode may continue.
///
/// [`step`]: Env::step
pub trait Env {
    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Observation;

    /// Advance the environment by one action signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the action is malformed or the simulation diverges.
    fn step(&mut self, action: &[f64]) -> Result<Transition, EvalError>;
}

/// Pole balancing: a [`CartPole`] driven through an [`Actuator`].
pub struct BalanceEnv {
    sim: CartPole,
    actuator: Actuator,
    action_size: usize,
    last_force: f64,
}

impl BalanceEnv {
    #[must_use]
    pub fn new(sim: CartPole, actuator: Actuator, action_size: usize) -> Self {
        Self { sim, actuator, action_size, last_force: 0.0 }
    }

    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.sim.state()
    }

    /// Force applied by the most recent step.
    #[must_use]
    pub fn last_force(&self) -> f64 {
        self.last_force
    }
}

impl Env for BalanceEnv {
    fn reset(&mut self) -> Observation {
        self.sim.reset();
        self.last_force = 0.0;
        self.sim.observe()
    }

    fn step(&mut self, action: &[f64]) -> Result<Transition, EvalError> {
        validate_action(action, self.action_size)?;
        let signal = action
            .first()
            .copied()
            .ok_or(PolicyError::WrongArity { expected: self.action_size.max(1), got: 0 })?;
        self.last_force = self.actuator.force(signal);
        self.sim.step(self.last_force)?;
        if self.sim.is_failed() {
            Ok(Transition::Failed)
        } else {
            Ok(Transition::Running(self.sim.observe()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::ActuatorConfig;
    use physics::CartPoleConfig;

    fn env(action_size: usize) -> BalanceEnv {
        let sim = CartPole::with_seed(CartPoleConfig::default(), 3).unwrap();
        let actuator = Actuator::new(&ActuatorConfig::default(), 3).unwrap();
        BalanceEnv::new(sim, actuator, action_size)
    }

    #[test]
    fn empty_action_is_an_arity_error() {
        let mut env = env(0);
        env.reset();
        assert_eq!(
            env.step(&[]),
            Err(EvalError::Policy(PolicyError::WrongArity { expected: 1, got: 0 }))
        );
    }

    #[test]
    fn only_the_first_scalar_drives_the_force() {
        let mut env = env(2);
        env.reset();
        env.step(&[0.9, -5.0]).unwrap();
        assert_eq!(env.last_force(), 10.0);
    }
}
