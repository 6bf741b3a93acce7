//! Configuration system (layered: defaults < TOML file < environment).

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{AuthorizationCoordinator, AuthorizationRequest, Credential, TokenStore};
use crate::error::{Result, SetupError};
use crate::resource::DEFAULT_PAGE_SIZE;

pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:3006/oauth";
pub const DEFAULT_BASE_URL: &str = "https://developer.api.autodesk.com";

/// Settings for one setup session.
///
/// Keys in a TOML file use the field names below; environment variables
/// override them (`FORGE_CLIENT_ID`, `BIM_SETUP_PAGE_SIZE`, ...).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub base_url: String,
    /// Defaults to `{base_url}/authentication/v1/authorize`.
    pub authorize_url: Option<String>,
    /// Defaults to `{base_url}/authentication/v1/gettoken`.
    pub token_url: Option<String>,
    /// Pre-obtained bearer token. When set, no browser flow runs until it
    /// goes stale.
    pub access_token: Option<String>,
    pub page_size: usize,
    pub token_freshness_secs: u64,
    /// `0` waits for the user indefinitely.
    pub auth_timeout_secs: u64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            authorize_url: None,
            token_url: None,
            access_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            token_freshness_secs: crate::auth::DEFAULT_FRESHNESS_WINDOW.as_secs(),
            auth_timeout_secs: crate::auth::DEFAULT_ACQUISITION_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for SetupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"..")
            .field("callback_url", &self.callback_url)
            .field("base_url", &self.base_url)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("access_token", &self.access_token.as_ref().map(|_| ".."))
            .field("page_size", &self.page_size)
            .field("token_freshness_secs", &self.token_freshness_secs)
            .field("auth_timeout_secs", &self.auth_timeout_secs)
            .finish()
    }
}

impl SetupConfig {
    /// Load from environment variables, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| SetupError::Configuration(format!("invalid config file: {e}")))
    }

    /// Optional TOML file, then environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("FORGE_CLIENT_ID") {
            self.client_id = v;
        }
        if let Some(v) = non_empty("FORGE_CLIENT_SECRET") {
            self.client_secret = v;
        }
        if let Some(v) = non_empty("FORGE_CALLBACK_URL") {
            self.callback_url = v;
        }
        if let Some(v) = non_empty("FORGE_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = non_empty("FORGE_AUTHORIZE_URL") {
            self.authorize_url = Some(v);
        }
        if let Some(v) = non_empty("FORGE_TOKEN_URL") {
            self.token_url = Some(v);
        }
        if let Some(v) = non_empty("FORGE_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        if let Some(v) = non_empty("BIM_SETUP_PAGE_SIZE") {
            self.page_size = parse_number("BIM_SETUP_PAGE_SIZE", &v)?;
        }
        if let Some(v) = non_empty("BIM_SETUP_TOKEN_FRESHNESS_SECS") {
            self.token_freshness_secs = parse_number("BIM_SETUP_TOKEN_FRESHNESS_SECS", &v)?;
        }
        if let Some(v) = non_empty("BIM_SETUP_AUTH_TIMEOUT_SECS") {
            self.auth_timeout_secs = parse_number("BIM_SETUP_AUTH_TIMEOUT_SECS", &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(SetupError::Configuration("client_id is required (FORGE_CLIENT_ID)".into()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(SetupError::Configuration(
                "client_secret is required (FORGE_CLIENT_SECRET)".into(),
            ));
        }
        let callback = reqwest::Url::parse(&self.callback_url).map_err(|e| {
            SetupError::Configuration(format!(
                "callback_url '{}' is not a URL: {e}",
                self.callback_url
            ))
        })?;
        if !matches!(callback.scheme(), "http" | "https") {
            return Err(SetupError::Configuration(format!(
                "callback_url must be http(s), got '{}'",
                callback.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(SetupError::Configuration("page_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn authorize_endpoint(&self) -> String {
        self.authorize_url.clone().unwrap_or_else(|| {
            format!("{}/authentication/v1/authorize", self.base_url.trim_end_matches('/'))
        })
    }

    pub fn token_endpoint(&self) -> String {
        self.token_url.clone().unwrap_or_else(|| {
            format!("{}/authentication/v1/gettoken", self.base_url.trim_end_matches('/'))
        })
    }

    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.token_freshness_secs)
    }

    pub fn acquisition_timeout(&self) -> Option<Duration> {
        (self.auth_timeout_secs > 0).then(|| Duration::from_secs(self.auth_timeout_secs))
    }

    pub fn authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest::new(&self.client_id, &self.client_secret, &self.callback_url)
    }

    /// Coordinator wired with this configuration, pre-seeded with
    /// `access_token` when one is set.
    pub fn coordinator(&self) -> Result<AuthorizationCoordinator> {
        self.validate()?;
        let store = TokenStore::new(self.freshness_window());
        if let Some(token) = &self.access_token {
            store.replace(Credential::new(token, "Bearer", None));
        }
        Ok(AuthorizationCoordinator::new(
            self.authorization_request(),
            self.authorize_endpoint(),
            self.token_endpoint(),
        )
        .with_store(store)
        .with_timeout(self.acquisition_timeout()))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| SetupError::Configuration(format!("{key}='{raw}' is not a valid number: {e}")))
}
