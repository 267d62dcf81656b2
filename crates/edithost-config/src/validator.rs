//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], for callers that abort on errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_logging(config, &mut result);
        Self::validate_registry(config, &mut result);
        Self::validate_flash_messages(config, &mut result);
        Self::validate_routes(config, &mut result);

        result
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }

        if let Some(ref dir) = config.logging.file {
            if dir.is_file() {
                result.add_error(ValidationError::new(
                    "logging.file",
                    format!("Log directory is a file: {:?}", dir),
                ));
            }
        }
    }

    fn validate_registry(config: &Config, result: &mut ValidationResult) {
        if config.registry.allow_overwrite {
            result.add_warning(ValidationWarning::new(
                "registry.allow_overwrite",
                "Later manifests will silently replace registry entries",
            ));
        }
    }

    fn validate_flash_messages(config: &Config, result: &mut ValidationResult) {
        if config.flash_messages.success_timeout_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "flash_messages.success_timeout_ms",
                "Success messages will never be dismissed automatically",
            ));
        }
    }

    fn validate_routes(config: &Config, result: &mut ValidationResult) {
        let mut names: Vec<&String> = config.routes.keys().collect();
        names.sort();
        for name in names {
            if config.routes[name].trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("routes.{}", name),
                    "Route URI cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
