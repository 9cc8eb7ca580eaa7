use super::{types::Config, ConfigError};
use crate::filter::ResultFilter;

/// Validate configuration.
///
/// Checks that timeouts are non-zero, that pagination has a cap and that a
/// relevance pattern override (if any) compiles.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.catalog.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.base_url cannot be empty".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 || config.time_source.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "timeouts must be at least 1 second".to_string(),
        ));
    }

    if config.catalog.max_pages == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.max_pages cannot be 0".to_string(),
        ));
    }

    if let Some(pattern) = &config.filter.pattern {
        ResultFilter::new(pattern).map_err(|e| {
            ConfigError::ValidationError(format!("filter.pattern is not a valid regex: {}", e))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterConfig, ServerConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.time_source.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_max_pages_fails() {
        let mut config = Config::default();
        config.catalog.max_pages = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_pattern_fails() {
        let config = Config {
            filter: FilterConfig {
                pattern: Some("(unclosed".to_string()),
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("filter.pattern"));
    }
}
