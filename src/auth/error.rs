use std::time::Duration;

use thiserror::Error;

/// Terminal failure reasons of an authorization acquisition.
///
/// Cloneable so one failure can be handed to every caller waiting on the
/// same acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The local callback listener could not be bound.
    #[error("Local callback listener unavailable: {0}")]
    PlatformUnsupported(String),
    /// The redirect carried no authorization code.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),
    #[error(
        "Token exchange rejected{}: {message}",
        .status.map(|s| format!(" (status {s})")).unwrap_or_default()
    )]
    TokenExchangeRejected {
        status: Option<u16>,
        message: String,
    },
    #[error("Authorization timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("Invalid authorization configuration: {0}")]
    Configuration(String),
}

impl AuthError {
    pub(crate) fn exchange_transport(error: &reqwest::Error) -> Self {
        Self::TokenExchangeRejected {
            status: error.status().map(|s| s.as_u16()),
            message: format!("transport failure: {error}"),
        }
    }
}
