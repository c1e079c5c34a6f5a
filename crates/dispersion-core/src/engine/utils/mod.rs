//! Utility functions for the engine module.
//!
//! - [`sampling`] - Reproducible random starting configurations for multi-start searches

pub mod sampling;
