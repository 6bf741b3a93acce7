//! Shared HTTP client, bearer headers and status checks.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};

use crate::auth::Credential;
use crate::error::SetupError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default HTTP client");
                reqwest::Client::new()
            })
    })
}

/// `Authorization: Bearer ...` plus `Accept: application/json`.
pub fn bearer_headers(credential: &Credential) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(mut value) = HeaderValue::from_str(&credential.authorization_header()) {
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Pass the response through when it has the expected status, otherwise
/// turn it into [`SetupError::UnexpectedStatus`] carrying the body.
pub async fn expect_status(
    resource: &str,
    response: Response,
    expected: StatusCode,
) -> Result<Response, SetupError> {
    if response.status() == expected {
        return Ok(response);
    }
    Err(status_error(resource, response, expected).await)
}

/// Like [`expect_status`] but accepts any 2xx.
pub async fn expect_success(resource: &str, response: Response) -> Result<Response, SetupError> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(status_error(resource, response, StatusCode::OK).await)
}

async fn status_error(resource: &str, response: Response, expected: StatusCode) -> SetupError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SetupError::UnexpectedStatus {
        resource: resource.to_string(),
        status,
        expected: expected.as_u16(),
        body,
    }
}
