//! # Core Module
//!
//! The stateless foundation of the library: point value types, the energy field and
//! reading/writing point sets.
//!
//! - **Point Representation** ([`models`]) - `Point` and `PointSet`
//! - **Energy Field** ([`field`]) - Pairwise and unary potentials, their partial
//!   derivatives, and the per-point energy and gradient terms
//! - **File I/O** ([`io`]) - Loader/consumer traits and the paired column format
//!
//! Nothing in this module spawns threads; parallel evaluation lives in
//! [`crate::engine`].

pub mod field;
pub mod io;
pub mod models;
