use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Dispersion Developers",
    version,
    about = "Dispersion CLI - Places movable points among fixed ones by multi-start, normalized-gradient descent.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize a movable configuration among the given points.
    Run(RunArgs),
    /// Write a uniformly random point set in the paired column format.
    Generate(GenerateArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Input / Output ---
    /// File holding the x coordinates of the given points, one per line.
    #[arg(short = 'x', long, required = true, value_name = "PATH")]
    pub given_x: PathBuf,

    /// File holding the y coordinates of the given points, one per line.
    #[arg(short = 'y', long, required = true, value_name = "PATH")]
    pub given_y: PathBuf,

    /// Where to write the x coordinates of the best configuration.
    #[arg(long, default_value = "xx.txt", value_name = "PATH")]
    pub output_x: PathBuf,

    /// Where to write the y coordinates of the best configuration.
    #[arg(long, default_value = "yy.txt", value_name = "PATH")]
    pub output_y: PathBuf,

    /// Also write a TOML summary of the best solution.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start from this configuration (x column) instead of random candidates.
    #[arg(long, requires = "initial_y", value_name = "PATH")]
    pub initial_x: Option<PathBuf>,

    /// Start from this configuration (y column) instead of random candidates.
    #[arg(long, requires = "initial_x", value_name = "PATH")]
    pub initial_y: Option<PathBuf>,

    // --- Search Overrides ---
    /// Override the number of movable points in each random candidate.
    #[arg(short = 'n', long, value_name = "INT")]
    pub movable_points: Option<usize>,

    /// Override the number of random restarts.
    #[arg(short, long, value_name = "INT")]
    pub restarts: Option<usize>,

    /// Override the master seed for candidate generation.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the number of runs executed concurrently.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub outer_threads: Option<usize>,

    /// Override the number of workers each run uses for its own evaluations.
    #[arg(long, value_name = "NUM")]
    pub inner_threads: Option<usize>,

    // --- Optimization Overrides ---
    /// Override the convergence tolerance (gradient norm and step floor).
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Override the initial step length.
    #[arg(long, value_name = "FLOAT")]
    pub initial_step: Option<f64>,

    /// Override the iteration budget of each run.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.restarts=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of points to generate.
    #[arg(short = 'n', long, required = true, value_name = "INT")]
    pub count: usize,

    /// Destination of the x column.
    #[arg(short = 'x', long, required = true, value_name = "PATH")]
    pub output_x: PathBuf,

    /// Destination of the y column.
    #[arg(short = 'y', long, required = true, value_name = "PATH")]
    pub output_y: PathBuf,

    /// Seed for the generator. A time-based seed is used when omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Inclusive lower bound on both axes.
    #[arg(long, default_value_t = -10.0, allow_negative_numbers = true, value_name = "FLOAT")]
    pub lower: f64,

    /// Exclusive upper bound on both axes.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true, value_name = "FLOAT")]
    pub upper: f64,
}
