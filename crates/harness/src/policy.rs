//! The seam between the harness and whatever produces control decisions.

use physics::Observation;

use crate::error::PolicyError;

/// A control policy: maps an observation to a raw action signal.
///
/// Implementations must be deterministic for fixed internal parameters and
/// must not depend on evaluation order, since episodes may run on separate
/// threads.
pub trait Policy: Sync {
    /// Compute the action signal for one observation.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] when the policy cannot produce an output.
    fn activate(&self, observation: &Observation) -> Result<Vec<f64>, PolicyError>;
}

impl<F> Policy for F
where
    F: Fn(&Observation) -> Vec<f64> + Sync,
{
    fn activate(&self, observation: &Observation) -> Result<Vec<f64>, PolicyError> {
        Ok(self(observation))
    }
}

/// Check that an action signal has the expected width and only finite values.
///
/// # Errors
///
/// [`PolicyError::WrongArity`] or [`PolicyError::NonFinite`].
pub fn validate_action(action: &[f64], expected: usize) -> Result<(), PolicyError> {
    if action.len() != expected {
        return Err(PolicyError::WrongArity { expected, got: action.len() });
    }
    match action.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(PolicyError::NonFinite { index, value: action[index] }),
        None => Ok(()),
    }
}
