//! # Core Models Module
//!
//! Value types shared by every layer of the library.
//!
//! - [`point`] - The 2D `Point`, `PointSet`, and the Euclidean norm over a gradient vector
//! - [`solution`] - The outcome of a run (`Solution`) and why it stopped (`Termination`)

pub mod point;
pub mod solution;
