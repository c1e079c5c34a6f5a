//! # Energy Field Module
//!
//! The fixed energy model the optimizer descends.
//!
//! ## Overview
//!
//! The field is built from two kernels:
//!
//! - **Pair potential** `V(p, q) = exp(-0.3 |p - q|^2)` between a movable point and
//!   each of its neighbours
//! - **Unary potential** `U(p) = 0.4 + (x^4 + y^4 + 200 (sin x + cos y)) / 1000`
//!   acting on every movable point
//!
//! For movable point `i` the neighbours are all given points followed by every other
//! movable point. The total energy is `Σ_i [U(M_i) + Σ_q V(q, M_i)]`.
//!
//! ## Key Components
//!
//! - [`potentials`] - The scalar kernels and the partial derivatives used for descent
//! - [`energy`] - Per-point energy and gradient terms, plus sequential totals
//!
//! The gradient produced here differentiates only each point's own term. It is the
//! direction the optimizer is built around and is intentionally not the analytic
//! gradient of the total energy.

pub mod energy;
pub mod potentials;
