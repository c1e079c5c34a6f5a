use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use dispersion::core::io::{columns::ColumnFile, traits::PointSetWriter};
use dispersion::engine::config::SamplingConfig;
use dispersion::engine::utils::sampling;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

pub fn run(args: GenerateArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    let plan = SamplingConfig {
        restarts: 1,
        movable_points: args.count,
        lower_bound: args.lower,
        upper_bound: args.upper,
        seed,
    };
    plan.validate()
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let points = sampling::candidate(&plan, 0).map_err(|e| CliError::Argument(e.to_string()))?;
    ColumnFile::write_to_paths(&points, &args.output_x, &args.output_y).map_err(|source| {
        CliError::PointFile {
            x: args.output_x.clone(),
            y: args.output_y.clone(),
            source,
        }
    })?;

    info!(count = points.len(), seed, "Random point set written.");
    println!(
        "✓ Wrote {} point(s) (seed {}) to {} and {}",
        points.len(),
        seed,
        args.output_x.display(),
        args.output_y.display()
    );
    Ok(())
}
