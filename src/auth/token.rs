use std::time::Duration;

use chrono::{DateTime, Utc};

/// Bearer credential obtained from the token endpoint.
///
/// # Example
/// ```
/// use bim_setup::auth::Credential;
///
/// let credential = Credential::new("access", "Bearer", Some(3599));
/// assert_eq!(credential.authorization_header(), "Bearer access");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime advertised by the provider, in seconds. Informational only;
    /// reuse is governed by the store's freshness window.
    pub expires_in: Option<u64>,
    pub acquired_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: Option<u64>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in,
            acquired_at: Utc::now(),
        }
    }

    pub fn acquired_at(mut self, at: DateTime<Utc>) -> Self {
        self.acquired_at = at;
        self
    }

    /// True while `now - acquired_at < window`.
    pub fn is_fresh_at(&self, window: Duration, now: DateTime<Utc>) -> bool {
        let Ok(window) = chrono::Duration::from_std(window) else {
            return true;
        };
        now.signed_duration_since(self.acquired_at) < window
    }

    /// Value for the `Authorization` header. Always presented as `Bearer`
    /// regardless of the casing the provider used for `token_type`.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
