use instance_lifecycle_core::contract::ValidationError;
use thiserror::Error;

/// Provider error code returned while a freshly launched instance is not yet
/// visible to read APIs.
pub const INSTANCE_NOT_FOUND_CODE: &str = "InvalidInstanceID.NotFound";

/// Failure of a lifecycle operation, tagged by cause.
///
/// Every variant is reported to HTTP callers as status 400; the tag is kept so
/// logs and in-process callers can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Provider {
        code: Option<String>,
        message: String,
    },
    #[error("{0}")]
    Internal(String),
}

impl LifecycleError {
    pub fn provider(code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Provider { .. } => "provider_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        400
    }

    pub fn is_instance_not_found(&self) -> bool {
        matches!(
            self,
            Self::Provider { code: Some(code), .. } if code == INSTANCE_NOT_FOUND_CODE
        )
    }
}

impl From<ValidationError> for LifecycleError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.message().to_string())
    }
}
