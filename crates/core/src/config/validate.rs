use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Worker pool width is at least 1
/// - Chunk size is not 0
/// - Resolver makes at least one attempt
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.retrieval.max_parallel == 0 {
        return Err(ConfigError::ValidationError(
            "retrieval.max_parallel can't be less than 1".to_string(),
        ));
    }

    if config.retrieval.chunk_size == 0 {
        return Err(ConfigError::ValidationError(
            "retrieval.chunk_size cannot be 0".to_string(),
        ));
    }

    if config.resolver.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_attempts cannot be 0".to_string(),
        ));
    }

    Ok(())
}
