#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Cart-pole physics
//!
//! A small, deterministic simulator of an inverted pendulum hinged on a cart
//! that moves along a bounded track.
//!
//! ## Key Components
//!
//! -   **State:** [`SimulationState`] holds the cart position and velocity and
//!     the pole angle and angular velocity. [`Bounds`] defines the region in
//!     which the pole counts as balanced.
//! -   **Simulation:** [`CartPole`] owns one state, resets it according to a
//!     [`ResetStrategy`], advances it with a fixed-step [`Integrator`] and
//!     exposes a scaled [`Observation`] for control policies.
//! -   **Configuration:** [`CartPoleConfig`] gathers every physical and
//!     numerical constant; it is validated before any simulator is built.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{CartPole, CartPoleConfig};
//!
//! let mut sim = CartPole::with_seed(CartPoleConfig::default(), 7)?;
//! let mut survived = 0;
//! while survived < 100 {
//!     let obs = sim.observe();
//!     let force = if obs[2] > 0.5 { 10.0 } else { -10.0 };
//!     sim.step(force)?;
//!     if sim.is_failed() {
//!         break;
//!     }
//!     survived += 1;
//! }
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod cartpole;
pub mod config;
pub mod error;
pub mod integrator;
pub mod types;


pub use cartpole::CartPole;
pub use config::{AffineScale, CartPoleConfig, ObservationScaling, ResetStrategy};
pub use error::PhysicsError;
pub use integrator::{Accelerations, Dynamics, Integrator};
pub use types::{Bounds, Observation, SimulationState, OBSERVATION_SIZE};
