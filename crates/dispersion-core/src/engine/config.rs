use thiserror::Error;

/// Convergence tolerance used for both the gradient norm and the step floor.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;
/// Step length of the first descent iteration.
pub const DEFAULT_INITIAL_STEP: f64 = 0.2;
/// Iteration budget of a single run.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;
/// Factor applied to the step after a rejected iteration.
pub const STEP_DECAY: f64 = 0.9;

/// Number of random restarts in a multi-start search.
pub const DEFAULT_RESTARTS: usize = 200;
/// Lower bound of the sampling square on both axes.
pub const DEFAULT_LOWER_BOUND: f64 = -10.0;
/// Upper bound (exclusive) of the sampling square on both axes.
pub const DEFAULT_UPPER_BOUND: f64 = 10.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn require_positive_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be a positive finite number, got {}", value),
        })
    }
}

fn require_nonzero(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidParameter {
            name,
            reason: "must be at least 1".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Step control for a single descent run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationConfig {
    /// Gradient-norm convergence threshold and step floor (EPS).
    pub tolerance: f64,
    /// Step length the run starts with.
    pub initial_step: f64,
    /// Hard cap on descent iterations.
    pub max_iterations: usize,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OptimizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive_finite("tolerance", self.tolerance)?;
        require_positive_finite("initial_step", self.initial_step)?;
        require_nonzero("max_iterations", self.max_iterations)
    }
}

/// How random starting configurations are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Number of candidate configurations.
    pub restarts: usize,
    /// Number of movable points in each candidate.
    pub movable_points: usize,
    /// Inclusive lower bound of the sampling square.
    pub lower_bound: f64,
    /// Exclusive upper bound of the sampling square.
    pub upper_bound: f64,
    /// Master seed; candidate `k` derives its own generator from it.
    pub seed: u64,
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lower_bound.is_finite() && self.upper_bound.is_finite())
            || self.lower_bound >= self.upper_bound
        {
            return Err(ConfigError::InvalidParameter {
                name: "bounds",
                reason: format!(
                    "expected finite lower < upper, got [{}, {})",
                    self.lower_bound, self.upper_bound
                ),
            });
        }
        Ok(())
    }
}

/// Everything a multi-start search needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub optimization: OptimizationConfig,
    pub sampling: SamplingConfig,
    /// Number of runs executed concurrently.
    pub outer_threads: usize,
    /// Number of workers each run uses for energy and gradient evaluation.
    pub inner_threads: usize,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.optimization.validate()?;
        self.sampling.validate()?;
        require_nonzero("outer_threads", self.outer_threads)?;
        require_nonzero("inner_threads", self.inner_threads)
    }
}

#[derive(Default)]
pub struct OptimizationConfigBuilder {
    tolerance: Option<f64>,
    initial_step: Option<f64>,
    max_iterations: Option<usize>,
}

impl OptimizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn initial_step(mut self, step: f64) -> Self {
        self.initial_step = Some(step);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn build(self) -> Result<OptimizationConfig, ConfigError> {
        let config = OptimizationConfig {
            tolerance: self
                .tolerance
                .ok_or(ConfigError::MissingParameter("tolerance"))?,
            initial_step: self
                .initial_step
                .ok_or(ConfigError::MissingParameter("initial_step"))?,
            max_iterations: self
                .max_iterations
                .ok_or(ConfigError::MissingParameter("max_iterations"))?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    tolerance: Option<f64>,
    initial_step: Option<f64>,
    max_iterations: Option<usize>,
    restarts: Option<usize>,
    movable_points: Option<usize>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    seed: Option<u64>,
    outer_threads: Option<usize>,
    inner_threads: Option<usize>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn initial_step(mut self, step: f64) -> Self {
        self.initial_step = Some(step);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn restarts(mut self, restarts: usize) -> Self {
        self.restarts = Some(restarts);
        self
    }
    pub fn movable_points(mut self, n: usize) -> Self {
        self.movable_points = Some(n);
        self
    }
    pub fn bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = Some(lower);
        self.upper_bound = Some(upper);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn outer_threads(mut self, threads: usize) -> Self {
        self.outer_threads = Some(threads);
        self
    }
    pub fn inner_threads(mut self, threads: usize) -> Self {
        self.inner_threads = Some(threads);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let optimization = OptimizationConfig {
            tolerance: self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            initial_step: self.initial_step.unwrap_or(DEFAULT_INITIAL_STEP),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
        };
        let sampling = SamplingConfig {
            restarts: self.restarts.unwrap_or(DEFAULT_RESTARTS),
            movable_points: self
                .movable_points
                .ok_or(ConfigError::MissingParameter("movable_points"))?,
            lower_bound: self.lower_bound.unwrap_or(DEFAULT_LOWER_BOUND),
            upper_bound: self.upper_bound.unwrap_or(DEFAULT_UPPER_BOUND),
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
        };
        let config = SearchConfig {
            optimization,
            sampling,
            outer_threads: self
                .outer_threads
                .ok_or(ConfigError::MissingParameter("outer_threads"))?,
            inner_threads: self
                .inner_threads
                .ok_or(ConfigError::MissingParameter("inner_threads"))?,
        };
        config.validate()?;
        Ok(config)
    }
}
