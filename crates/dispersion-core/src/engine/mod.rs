//! # Engine Module
//!
//! The optimization engine: everything that evaluates, descends and parallelizes.
//!
//! ## Overview
//!
//! A single run of the engine is a normalized-gradient descent with backtracking
//! step control. Energy and gradient evaluations fan out over the movable points
//! on a bounded worker pool owned by the run; the multi-start workflow fans whole
//! runs out on a second, independent pool.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tolerance, initial step, iteration budget and
//!   the two parallelism bounds
//! - **Parallel Map** ([`parallel`]) - Bounded fork-join map and ordered sum
//! - **Optimizer** ([`optimizer`]) - The line-search state machine for one run
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Sampling** ([`utils::sampling`]) - Seeded random candidate configurations
//!
//! Thread counts are always passed explicitly; the engine never configures the
//! global rayon pool.

pub mod config;
pub mod error;
pub mod optimizer;
pub mod parallel;
pub mod progress;
pub(crate) mod tasks;
pub mod utils;
