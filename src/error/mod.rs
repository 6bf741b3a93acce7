//! Error types for bim-setup.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for resource and configuration operations.
///
/// Every variant that comes from a remote call names the resource it was
/// issued against so the calling workflow can log an actionable line.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error on {resource}: {message}")]
    Transport { resource: String, message: String },

    #[error("Unexpected status {status} from {resource} (expected {expected}): {body}")]
    UnexpectedStatus {
        resource: String,
        status: u16,
        expected: u16,
        body: String,
    },

    #[error("Failed to decode response from {resource}: {message}")]
    Decode { resource: String, message: String },

    #[error("Invalid resource template: {0}")]
    InvalidTemplate(String),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SetupError {
    pub(crate) fn transport(resource: impl Into<String>, error: &reqwest::Error) -> Self {
        Self::Transport {
            resource: resource.into(),
            message: error.to_string(),
        }
    }

    pub(crate) fn decode(resource: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Authentication(AuthError::TokenExchangeRejected { status, .. }) => *status,
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Transport { .. } => ErrorCategory::Network,
            Self::Configuration(_) | Self::InvalidTemplate(_) => ErrorCategory::Configuration,
            Self::Decode { .. } => ErrorCategory::Serialization,
            Self::Io(_) => ErrorCategory::Io,
            Self::UnexpectedStatus { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether a caller could reasonably try this call again.
    ///
    /// Nothing in this crate retries on its own; this only informs the
    /// workflow's skip/retry decision.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::Reauthenticate,
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server => {
                RecoverySuggestion::RetryLater
            }
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Api | ErrorCategory::Serialization => RecoverySuggestion::CheckPayload,
            ErrorCategory::Io => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SetupError>;
