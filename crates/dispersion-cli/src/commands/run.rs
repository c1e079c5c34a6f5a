use crate::cli::RunArgs;
use crate::config::PartialSearchConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dispersion::{
    core::io::{
        columns::{ColumnFile, ColumnOutput},
        traits::{PointSetLoader, ResultConsumer},
    },
    core::models::{
        point::{Point, PointSet},
        solution::{Solution, Termination},
    },
    engine::{config::SearchConfig, progress::ProgressReporter},
    workflows::{multistart, optimize},
};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Summary written by `--report`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct RunReport<'a> {
    value: f64,
    iterations: usize,
    termination: Termination,
    given_points: usize,
    movable_points: usize,
    restarts: usize,
    seed: u64,
    outer_threads: usize,
    inner_threads: usize,
    elapsed_seconds: f64,
    points: &'a [Point],
}

impl<'a> RunReport<'a> {
    fn new(
        solution: &'a Solution,
        given: usize,
        restarts: usize,
        config: &SearchConfig,
        elapsed: Duration,
    ) -> Self {
        Self {
            value: solution.value,
            iterations: solution.iterations,
            termination: solution.termination,
            given_points: given,
            movable_points: solution.points.len(),
            restarts,
            seed: config.sampling.seed,
            outer_threads: config.outer_threads,
            inner_threads: config.inner_threads,
            elapsed_seconds: elapsed.as_secs_f64(),
            points: &solution.points,
        }
    }

    fn write(&self, path: &Path) -> Result<()> {
        let text = toml::to_string(self).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn load_points(x: &Path, y: &Path) -> Result<PointSet> {
    ColumnFile::read_from_paths(x, y).map_err(|source| CliError::PointFile {
        x: x.to_path_buf(),
        y: y.to_path_buf(),
        source,
    })
}

pub fn run(args: RunArgs, quiet: bool) -> Result<()> {
    info!("Loading given points from {:?} and {:?}", &args.given_x, &args.given_y);
    let given = load_points(&args.given_x, &args.given_y)?;
    info!(count = given.len(), "Given points loaded.");

    let initial = match (&args.initial_x, &args.initial_y) {
        (Some(x), Some(y)) => {
            let points = load_points(x, y)?;
            info!(count = points.len(), "Starting configuration loaded.");
            Some(points)
        }
        _ => None,
    };

    let partial = PartialSearchConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial.merge_with_cli(&args, initial.as_ref().map(Vec::len), given.len())?;

    let started = Instant::now();
    let (best, restarts) = match initial {
        Some(points) => {
            println!("Optimizing the supplied configuration of {} point(s)...", points.len());
            let solution = optimize::optimize_with(
                &given,
                &points,
                config.inner_threads,
                &config.optimization,
            )?;
            (Some(solution), 1)
        }
        None => {
            println!(
                "Starting multi-start search: {} restart(s), {} movable point(s)...",
                config.sampling.restarts, config.sampling.movable_points
            );
            let progress_handler = if quiet {
                CliProgressHandler::hidden()
            } else {
                CliProgressHandler::new()
            };
            let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
            (
                multistart::run_search(&given, &config, &reporter)?,
                config.sampling.restarts,
            )
        }
    };
    let elapsed = started.elapsed();

    let Some(best) = best else {
        warn!("Search completed but no candidates were run.");
        println!("Warning: no candidates were run; nothing was written.");
        return Ok(());
    };

    if !best.is_finite() {
        warn!(value = best.value, "Best configuration is not finite.");
    }

    ColumnOutput::new(&args.output_x, &args.output_y)
        .consume(&best)
        .map_err(|source| CliError::PointFile {
            x: args.output_x.clone(),
            y: args.output_y.clone(),
            source,
        })?;
    info!(
        value = best.value,
        iterations = best.iterations,
        elapsed_ms = elapsed.as_millis() as u64,
        "Best configuration written."
    );

    if let Some(report_path) = &args.report {
        RunReport::new(&best, given.len(), restarts, &config, elapsed).write(report_path)?;
        info!("Report written to {:?}", report_path);
    }

    println!(
        "✓ Best value {:.6} ({}, {} iteration(s)) written to {} and {}",
        best.value,
        best.termination,
        best.iterations,
        args.output_x.display(),
        args.output_y.display()
    );
    println!("  Run time: {:.3}s", elapsed.as_secs_f64());

    Ok(())
}
