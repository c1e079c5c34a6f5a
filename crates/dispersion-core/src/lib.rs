//! # Dispersion Core Library
//!
//! Multi-start, normalized-gradient descent for configurations of movable points
//! placed among a fixed set of given points.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`Point`, `PointSet`), the
//!   pure energy kernels and their per-point sums, and point-set I/O.
//!
//! - **[`engine`]: The Logic Core.** Bounded worker pools, the parallel energy and
//!   gradient tasks, the backtracking line-search optimizer, configuration, progress
//!   reporting and candidate sampling.
//!
//! - **[`workflows`]: The Public API.** The single-run [`workflows::optimize`] entry
//!   point and the multi-start search [`workflows::multistart`].
//!
//! ## Example
//!
//! ```
//! use dispersion::core::models::point::Point;
//! use dispersion::workflows::{multistart, optimize};
//!
//! let given = vec![Point::new(0.0, 0.0), Point::new(3.0, 1.0)];
//! let candidates = vec![
//!     vec![Point::new(1.0, 1.0)],
//!     vec![Point::new(-2.0, 0.5)],
//! ];
//!
//! let single = optimize::optimize(&given, &candidates[0], 1).unwrap();
//! let best = multistart::run_multi_start(&given, &candidates, 2, 1)
//!     .unwrap()
//!     .unwrap();
//! assert!(best.value <= single.value);
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
