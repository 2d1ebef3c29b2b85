use thiserror::Error;

/// Construction-time configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("population size must be positive")]
    ZeroPopulation,
    #[error("n_grad ({n_grad}) cannot exceed the population size ({pop_size})")]
    GradExceedsPopulation { n_grad: usize, pop_size: usize },
    #[error("batch size must be positive")]
    ZeroBatchSize,
    #[error("policy delay must be positive")]
    ZeroPolicyDelay,
}
