//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.counting.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "counting.parallel_workers must be > 0".into(),
            ));
        }
        let smoothing = self.scoring.smoothing;
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "scoring.smoothing must be a finite value > 0, got {smoothing}"
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_parallel_workers() {
        let mut config = Config::default();
        config.counting.parallel_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[test]
    fn test_validate_rejects_non_positive_smoothing() {
        let mut config = Config::default();
        config.scoring.smoothing = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("smoothing"));

        config.scoring.smoothing = -0.1;
        assert!(config.validate().is_err());

        config.scoring.smoothing = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
