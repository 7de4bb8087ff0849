#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Policy evaluation harness
//!
//! Scores control policies on the cart-pole task from the [`physics`] crate.
//!
//! A policy is anything implementing [`Policy`]: it maps the simulator's
//! scaled observation to an action signal. The [`Evaluator`] runs a fixed
//! number of episodes per policy, translating each action into a force
//! through the configured [`ActuatorMapping`], and reduces the steps each
//! episode survived into one fitness with an [`Aggregation`] (the worst
//! episode by default).
//!
//! Candidate generation, selection and variation belong to an external
//! evolutionary process, which plugs in through [`Population`].
//!
//! ```rust
//! use harness::{Evaluator, EvaluationConfig};
//! use physics::{CartPoleConfig, Observation};
//!
//! let config = EvaluationConfig { num_episodes: 3, max_steps_per_episode: 500, ..Default::default() };
//! let evaluator = Evaluator::new(CartPoleConfig::default(), config)?;
//!
//! // Push toward the side the pole leans to.
//! let lean = |obs: &Observation| vec![obs[2]];
//! let fitness = evaluator.evaluate(&lean)?;
//! assert!((0.0..=500.0).contains(&fitness));
//! # Ok::<(), harness::EvalError>(())
//! ```

pub mod actuator;
pub mod aggregate;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod nn;
pub mod policy;
pub mod population;

pub use actuator::{Actuator, ActuatorConfig, ActuatorMapping};
pub use aggregate::Aggregation;
pub use env::{BalanceEnv, Env, Transition};
pub use error::{EvalError, PolicyError};
pub use evaluator::{
    run_episode, EpisodeResult, EpisodeSeeding, EvaluationConfig, Evaluator, Fitness, StepRecord,
    Termination, TraceStep,
};
pub use nn::{Activation, Dense, FeedForward, NetworkError};
pub use policy::{validate_action, Policy};
pub use population::{evaluate_generation, Population};
