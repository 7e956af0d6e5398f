use serde::Serialize;

/// Error type shared by services, commands, and the backend client.
///
/// Mutations are single fire-and-forget calls, so any rejected call
/// (validation, gating, network) surfaces here for the caller to present;
/// there is no retry layer underneath.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend returned {status}: {message}")]
    ExternalApiError { status: u16, message: String },

    #[error("API request error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{entity} {id} not found"))
    }

    /// True when the failure is the backend rejecting the request rather
    /// than a local precondition.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ServiceError::ExternalApiError { .. } | ServiceError::ApiError(_)
        )
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Wire shape for reporting an error to a caller that wants JSON.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub message: String,
}

impl From<&ServiceError> for ErrorReport {
    fn from(err: &ServiceError) -> Self {
        let error = match err {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::ValidationError(_) => "validation_error",
            ServiceError::InvalidOperation(_) => "invalid_operation",
            ServiceError::InvalidStatus(_) => "invalid_status",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::ExternalApiError { .. } | ServiceError::ApiError(_) => "backend_error",
            ServiceError::SerializationError(_) => "serialization_error",
            ServiceError::CacheError(_) => "cache_error",
            ServiceError::EventError(_) => "event_error",
            ServiceError::ConfigError(_) => "config_error",
        };
        ErrorReport {
            error: error.to_string(),
            message: err.to_string(),
        }
    }
}
