//! # Workflows Module
//!
//! The public entry points of the library.
//!
//! ## Overview
//!
//! Workflows validate their inputs up front, build the worker pools they need, drive
//! the engine, and report progress through a [`crate::engine::progress::ProgressReporter`].
//!
//! - **Single Run** ([`optimize`]) - One line-search descent from a given starting
//!   configuration
//! - **Multi-Start Search** ([`multistart`]) - Many independent descents run
//!   concurrently, reduced to the lowest-energy solution
//!
//! Both levels of parallelism are explicit arguments. A multi-start search with
//! `outer` concurrent runs of `inner` workers each uses at most `outer * inner`
//! evaluation threads.

pub mod multistart;
pub mod optimize;
