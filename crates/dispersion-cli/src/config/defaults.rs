use dispersion::engine::config::{
    DEFAULT_INITIAL_STEP, DEFAULT_LOWER_BOUND, DEFAULT_MAX_ITERATIONS, DEFAULT_RESTARTS,
    DEFAULT_TOLERANCE, DEFAULT_UPPER_BOUND,
};
use std::num::NonZeroUsize;
use std::thread;

/// Values used for every setting that neither the config file nor the command line
/// provides.
pub struct DefaultsConfig {
    pub tolerance: f64,
    pub initial_step: f64,
    pub max_iterations: usize,
    pub restarts: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outer_threads: usize,
    pub inner_threads: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            restarts: DEFAULT_RESTARTS,
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            outer_threads: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            inner_threads: 1,
        }
    }
}
