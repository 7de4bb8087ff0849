//! # polebench
//!
//! Command-line runner for scoring cart-pole balancing networks.
//!
//! ## Overview
//!
//! A network exported by an external neuroevolution run is loaded from JSON
//! and evaluated on the simulated cart-pole task. The fitness of a network is
//! the number of time steps it keeps the pole balanced and the cart on the
//! track, taken over its worst episode by default.
//!
//! ### The Crates
//!
//! -   **`polebench`:** The crate you are currently viewing. It loads run
//!     configurations and networks and drives the evaluation from the command
//!     line.
//! -   **[`physics`]:** The cart-pole simulator: dynamics, integration,
//!     failure bounds and observation scaling.
//! -   **[`harness`]:** The evaluation protocol: policies, actuator mapping,
//!     episodes, aggregation, and the interface to an evolutionary
//!     population.
//!
//! ## Configuration
//!
//! A run configuration is a JSON object with two optional sections,
//! `physics` and `evaluation`; `polebench defaults` prints a complete one.

pub mod app;
pub mod config;

pub use harness;
pub use physics;
