use std::collections::BTreeSet;

use reqwest::Url;
use strum::{AsRefStr, Display, EnumString};

use super::error::AuthError;

/// Capability tags requested from the authorization server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumString)]
pub enum Scope {
    #[strum(serialize = "data:read")]
    DataRead,
    #[strum(serialize = "data:write")]
    DataWrite,
}

impl Scope {
    /// Fixed scope set used by the setup workflows.
    pub fn default_set() -> BTreeSet<Scope> {
        BTreeSet::from([Scope::DataRead, Scope::DataWrite])
    }
}

/// Immutable inputs of one authorization-code grant.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: BTreeSet<Scope>,
}

impl AuthorizationRequest {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: Scope::default_set(),
        }
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    /// Space-separated scope string, in a stable order.
    pub fn scope_param(&self) -> String {
        self.scopes
            .iter()
            .map(Scope::as_ref)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// URL the user is sent to in the browser.
    pub fn authorization_url(
        &self,
        authorize_endpoint: &str,
        state: &str,
    ) -> Result<Url, AuthError> {
        let scope = self.scope_param();
        Url::parse_with_params(
            authorize_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("invalid authorize endpoint: {e}")))
    }
}
