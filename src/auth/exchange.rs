use serde::Deserialize;

use super::error::AuthError;
use super::request::AuthorizationRequest;
use super::token::Credential;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Trades an authorization code for a bearer credential.
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    client: reqwest::Client,
    token_url: String,
}

impl TokenExchanger {
    pub fn new(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub async fn exchange(
        &self,
        request: &AuthorizationRequest,
        code: &str,
    ) -> Result<Credential, AuthError> {
        let form = [
            ("client_id", request.client_id.as_str()),
            ("client_secret", request.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", request.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::exchange_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "token endpoint rejected authorization code");
            return Err(AuthError::TokenExchangeRejected {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            AuthError::TokenExchangeRejected {
                status: Some(status.as_u16()),
                message: format!("unreadable token response: {e}"),
            }
        })?;
        if body.access_token.is_empty() {
            return Err(AuthError::TokenExchangeRejected {
                status: Some(status.as_u16()),
                message: "token response has an empty access_token".to_string(),
            });
        }

        Ok(Credential::new(body.access_token, body.token_type, body.expires_in))
    }
}
