use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Artwork timeout is not 0
/// - Python interpreter is not empty
/// - Output directory is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.artwork.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "artwork.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.tools.python.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "tools.python cannot be empty".to_string(),
        ));
    }

    if config.downloads.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "downloads.output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
