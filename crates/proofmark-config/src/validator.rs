//! Configuration validation.

use crate::schema::Config;

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

        Self::validate_provider(config, &mut result);
        Self::validate_overlay(config, &mut result);

        result
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let provider = &config.provider;

        if provider.endpoint.is_empty() {
            result.add_error(ValidationError::new(
                "provider.endpoint",
                "Endpoint cannot be empty",
            ));
        } else if let Err(e) = Self::check_http_url(&provider.endpoint) {
            result.add_error(ValidationError::new("provider.endpoint", e));
        }

        if let Some(ref url) = provider.readiness_url {
            if let Err(e) = Self::check_http_url(url) {
                result.add_error(ValidationError::new("provider.readiness_url", e));
            }
        }

        if provider.model.is_empty() {
            result.add_error(ValidationError::new("provider.model", "Model cannot be empty"));
        }

        if provider.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "provider.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if provider.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "provider.api_key",
                "API key is not set, requests are sent without authorization",
            ));
        }
    }

    fn validate_overlay(config: &Config, result: &mut ValidationResult) {
        let overlay = &config.overlay;

        if overlay.min_words == 0 {
            result.add_error(ValidationError::new(
                "overlay.min_words",
                "min_words must be greater than 0",
            ));
        }

        if overlay.reset_delay_ms == 0 {
            result.add_error(ValidationError::new(
                "overlay.reset_delay_ms",
                "reset_delay_ms must be greater than 0",
            ));
        }

        if overlay.position_refresh_ms == 0 {
            result.add_error(ValidationError::new(
                "overlay.position_refresh_ms",
                "position_refresh_ms must be greater than 0",
            ));
        } else if overlay.position_refresh_ms < 16 {
            result.add_warning(ValidationWarning::new(
                "overlay.position_refresh_ms",
                "position_refresh_ms below one frame (16ms) wastes work",
            ));
        }

        if overlay.button_size <= 0.0 {
            result.add_error(ValidationError::new(
                "overlay.button_size",
                "button_size must be positive",
            ));
        }

        if overlay.tooltip_max_width <= 0.0 || overlay.tooltip_max_height <= 0.0 {
            result.add_error(ValidationError::new(
                "overlay.tooltip_max_width",
                "tooltip bounds must be positive",
            ));
        }
    }

    fn check_http_url(raw: &str) -> Result<(), String> {
        let parsed = url::Url::parse(raw).map_err(|e| format!("Invalid URL '{}': {}", raw, e))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("Unsupported URL scheme '{}'", other)),
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
