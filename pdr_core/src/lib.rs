#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Pedestrian dead reckoning engine (I/O-free).
//!
//! This crate turns a time-ordered sequence of inertial samples into a 2D
//! walking trajectory and calibrates the two model coefficients against a
//! surveyed reference path. All ingestion and output live in the surrounding
//! crates; nothing in here reads a file or blocks.
//!
//! ## Architecture
//!
//! - **Ground truth**: step-ordered waypoint path with fractional-position
//!   interpolation (`path` module)
//! - **Trace**: single-pass step detection, heading integration, and position
//!   update (`engine` module)
//! - **Scoring**: per-point, per-run, and per-batch deviation sums (`score`
//!   module)
//! - **Calibration**: finite-difference gradient descent over `(k, m)`
//!   (`train` module)
//!
//! ## Determinism
//!
//! The trace is a pure function of its inputs; calling it twice with the same
//! samples and parameters yields bit-identical trajectories. Batch errors are
//! plain left-to-right sums: if evaluations are ever parallelized, reduction
//! order becomes a source of last-ulp nondeterminism.

pub mod config;
pub mod engine;
pub mod error;
pub mod path;
pub mod score;
pub mod train;
pub mod types;

pub use config::{ModelCfg, PoseCfg, TrainingCfg};
pub use engine::{PdrEngine, PdrEngineBuilder};
pub use error::{BuildError, Result};
pub use path::{GroundTruthPath, GroundTruthPoint};
pub use types::{InertialSample, StepParams, TrajectoryPoint};
