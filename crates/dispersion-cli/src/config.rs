pub mod defaults;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use dispersion::engine::config::{SearchConfig, SearchConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOptimizationConfig {
    tolerance: Option<f64>,
    #[serde(rename = "initial-step")]
    initial_step: Option<f64>,
    #[serde(rename = "max-iterations")]
    max_iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSamplingConfig {
    restarts: Option<usize>,
    #[serde(rename = "movable-points")]
    movable_points: Option<usize>,
    seed: Option<u64>,
    #[serde(rename = "lower-bound")]
    lower_bound: Option<f64>,
    #[serde(rename = "upper-bound")]
    upper_bound: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialParallelismConfig {
    #[serde(rename = "outer-threads")]
    outer_threads: Option<usize>,
    #[serde(rename = "inner-threads")]
    inner_threads: Option<usize>,
}

/// The settings a TOML config file may carry. Every key is optional.
///
/// ```toml
/// [optimization]
/// tolerance = 1e-3
/// initial-step = 0.2
/// max-iterations = 500
///
/// [sampling]
/// restarts = 200
/// movable-points = 10
/// seed = 42
/// lower-bound = -10.0
/// upper-bound = 10.0
///
/// [parallelism]
/// outer-threads = 8
/// inner-threads = 1
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialSearchConfig {
    optimization: Option<PartialOptimizationConfig>,
    sampling: Option<PartialSamplingConfig>,
    parallelism: Option<PartialParallelismConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn time_based_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

impl PartialSearchConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts empty when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final search settings.
    ///
    /// Precedence, highest first: dedicated CLI flags, `--set` overrides (applied on
    /// top of the file), the config file, built-in defaults.
    ///
    /// The movable point count falls back to the size of the loaded starting
    /// configuration, then to the number of given points.
    pub fn merge_with_cli(
        mut self,
        args: &RunArgs,
        loaded_movable: Option<usize>,
        given_points: usize,
    ) -> Result<SearchConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let opt = self.optimization.take().unwrap_or_default();
        let sampling = self.sampling.take().unwrap_or_default();
        let parallelism = self.parallelism.take().unwrap_or_default();

        let movable_points = args
            .movable_points
            .or(sampling.movable_points)
            .or(loaded_movable)
            .unwrap_or(given_points);

        let seed = match args.seed.or(sampling.seed) {
            Some(seed) => seed,
            None => {
                let seed = time_based_seed();
                info!(seed, "No seed given; using a time-based seed.");
                seed
            }
        };

        SearchConfigBuilder::new()
            .tolerance(args.tolerance.or(opt.tolerance).unwrap_or(defaults.tolerance))
            .initial_step(
                args.initial_step
                    .or(opt.initial_step)
                    .unwrap_or(defaults.initial_step),
            )
            .max_iterations(
                args.max_iterations
                    .or(opt.max_iterations)
                    .unwrap_or(defaults.max_iterations),
            )
            .restarts(args.restarts.or(sampling.restarts).unwrap_or(defaults.restarts))
            .movable_points(movable_points)
            .bounds(
                sampling.lower_bound.unwrap_or(defaults.lower_bound),
                sampling.upper_bound.unwrap_or(defaults.upper_bound),
            )
            .seed(seed)
            .outer_threads(
                args.outer_threads
                    .or(parallelism.outer_threads)
                    .unwrap_or(defaults.outer_threads),
            )
            .inner_threads(
                args.inner_threads
                    .or(parallelism.inner_threads)
                    .unwrap_or(defaults.inner_threads),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();

            match key {
                "optimization.tolerance" => {
                    self.optimization.get_or_insert_with(Default::default).tolerance =
                        Some(parse_value(key, value, "float")?);
                }
                "optimization.initial-step" => {
                    self.optimization.get_or_insert_with(Default::default).initial_step =
                        Some(parse_value(key, value, "float")?);
                }
                "optimization.max-iterations" => {
                    self.optimization.get_or_insert_with(Default::default).max_iterations =
                        Some(parse_value(key, value, "integer")?);
                }
                "sampling.restarts" => {
                    self.sampling.get_or_insert_with(Default::default).restarts =
                        Some(parse_value(key, value, "integer")?);
                }
                "sampling.movable-points" => {
                    self.sampling.get_or_insert_with(Default::default).movable_points =
                        Some(parse_value(key, value, "integer")?);
                }
                "sampling.seed" => {
                    self.sampling.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value, "integer")?);
                }
                "sampling.lower-bound" => {
                    self.sampling.get_or_insert_with(Default::default).lower_bound =
                        Some(parse_value(key, value, "float")?);
                }
                "sampling.upper-bound" => {
                    self.sampling.get_or_insert_with(Default::default).upper_bound =
                        Some(parse_value(key, value, "float")?);
                }
                "parallelism.outer-threads" => {
                    self.parallelism.get_or_insert_with(Default::default).outer_threads =
                        Some(parse_value(key, value, "integer")?);
                }
                "parallelism.inner-threads" => {
                    self.parallelism.get_or_insert_with(Default::default).inner_threads =
                        Some(parse_value(key, value, "integer")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
