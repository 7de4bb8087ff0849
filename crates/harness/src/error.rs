use physics::PhysicsError;
use thiserror::Error;

/// Failures attributed to the policy under evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("policy produced {got} outputs, expected {expected}")]
    WrongArity { expected: usize, got: usize },
    #[error("policy output {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },
    #[error("policy expects {expected} inputs, observation has {got}")]
    InputArity { expected: usize, got: usize },
    #[error("policy failed: {0}")]
    Failed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("invalid evaluation configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
