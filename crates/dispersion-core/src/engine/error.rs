use super::config::ConfigError;
use super::utils::sampling::SamplingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Candidate sampling failed: {source}")]
    Sampling {
        #[from]
        source: SamplingError,
    },

    #[error("Failed to build worker pool with {threads} thread(s): {reason}")]
    ThreadPool { threads: usize, reason: String },
}
