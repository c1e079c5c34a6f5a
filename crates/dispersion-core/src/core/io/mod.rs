//! # Point-Set I/O Module
//!
//! - [`traits`] - `PointSetLoader` and `ResultConsumer`, the interfaces collaborators
//!   implement to feed point sets in and take results out
//! - [`columns`] - The paired column format: one file of x values, one file of y values

pub mod columns;
pub mod traits;
