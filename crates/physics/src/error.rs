use thiserror::Error;

use crate::types::SimulationState;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("invalid cart-pole configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Integration left the finite domain without tripping the bounds check.
    #[error("non-finite simulation state after applying force {force}: {state:?}")]
    NonFiniteState { force: f64, state: SimulationState },
}

impl PhysicsError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        PhysicsError::InvalidConfig { field, value, reason }
    }
}
