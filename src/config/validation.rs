use crate::config::models::GatewayConfig;

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Gateway configuration validator. The process refuses to start when
/// validation fails.
pub struct GatewayConfigValidator;

impl GatewayConfigValidator {
    /// Validate the entire gateway configuration
    pub fn validate(config: &GatewayConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if config.base_url.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "base_url".to_string(),
            });
        } else if !config.base_url.ends_with('/') {
            // Rewritten paths are appended directly, so the trailing slash
            // is load-bearing.
            errors.push(ValidationError::InvalidField {
                field: "base_url".to_string(),
                message: "must end with '/'".to_string(),
            });
        }

        if config.credentials_file.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "credentials_file".to_string(),
            });
        }

        if config.listing_limit == 0 {
            errors.push(ValidationError::InvalidField {
                field: "listing_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            })
        }
    }
}
