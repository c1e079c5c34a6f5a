//! Parallel evaluation tasks used by every descent iteration.
//!
//! Each task fans the per-point terms of [`crate::core::field::energy`] out over a
//! [`crate::engine::parallel::WorkerPool`] and gathers them back in index order.

pub mod gradient;
pub mod total_energy;
