use crate::core::models::point::{Point, PointSet};
use crate::engine::config::SamplingConfig;
use crate::engine::parallel::WorkerPool;
use rand::prelude::*;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("Invalid sampling bounds [{lower}, {upper}): lower must be finite and below upper")]
    InvalidBounds { lower: f64, upper: f64 },
}

/// Derives the seed of stream `index` from `master_seed` with a SplitMix64 finalizer,
/// so neighbouring indices get unrelated generators.
pub fn derive_seed(master_seed: u64, index: u64) -> u64 {
    let mut z = master_seed.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Draws `size` points uniformly from the square `[lower, upper)^2`.
pub fn random_points(
    size: usize,
    lower: f64,
    upper: f64,
    rng: &mut impl Rng,
) -> Result<PointSet, SamplingError> {
    if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
        return Err(SamplingError::InvalidBounds { lower, upper });
    }
    Ok((0..size)
        .map(|_| Point::new(rng.gen_range(lower..upper), rng.gen_range(lower..upper)))
        .collect())
}

/// The candidate configuration with index `index` of a sampling plan.
///
/// Each candidate is drawn from its own generator seeded by [`derive_seed`], so the
/// result depends only on the master seed and the index.
pub fn candidate(config: &SamplingConfig, index: usize) -> Result<PointSet, SamplingError> {
    let mut rng = StdRng::seed_from_u64(derive_seed(config.seed, index as u64));
    random_points(
        config.movable_points,
        config.lower_bound,
        config.upper_bound,
        &mut rng,
    )
}

/// Generates every candidate of a sampling plan, in index order, on `pool`.
#[instrument(level = "debug", skip_all, fields(restarts = config.restarts, seed = config.seed))]
pub fn generate_candidates(
    config: &SamplingConfig,
    pool: &WorkerPool,
) -> Result<Vec<PointSet>, SamplingError> {
    pool.map_indexed(config.restarts, |k| candidate(config, k))
        .into_iter()
        .collect()
}
