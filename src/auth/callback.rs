//! Local HTTP endpoint that receives the authorization redirect.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::error::AuthError;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const CONFIRMATION_PAGE: &str =
    "<html><body>You can now close this window and return to the application.</body></html>";

/// Parameters carried by the redirect, consumed once by the exchange step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackResult {
    pub authorization_code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackResult {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            authorization_code: non_empty("code"),
            state: non_empty("state"),
            error: non_empty("error"),
        }
    }

    /// Authorization code, provided the redirect belongs to this acquisition.
    pub fn into_code(self, expected_state: &str) -> Result<String, AuthError> {
        if let Some(error) = self.error {
            return Err(AuthError::AuthorizationDenied(error));
        }
        let code = self.authorization_code.ok_or_else(|| {
            AuthError::AuthorizationDenied("no authorization code in callback".to_string())
        })?;
        match self.state.as_deref() {
            Some(state) if state == expected_state => Ok(code),
            _ => Err(AuthError::AuthorizationDenied(
                "callback state does not match this acquisition".to_string(),
            )),
        }
    }
}

type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>;

/// The redirect path is matched literally, not as an axum route pattern,
/// so segments such as `:id` or `*rest` carry no special meaning.
#[derive(Clone)]
struct CallbackRoute {
    path: Arc<str>,
    slot: CallbackSlot,
}

/// One-shot HTTP listener bound to the redirect URI's port on all interfaces.
///
/// The first request to the redirect path resolves [`Self::wait_for_callback`];
/// later requests still get the confirmation page but are ignored.
#[derive(Debug)]
pub struct CallbackListener {
    local_addr: SocketAddr,
    result_rx: Option<oneshot::Receiver<CallbackResult>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CallbackListener {
    pub async fn bind(redirect_uri: &str) -> Result<Self, AuthError> {
        let url = Url::parse(redirect_uri)
            .map_err(|e| AuthError::Configuration(format!("invalid redirect URI: {e}")))?;
        if url.scheme() != "http" {
            return Err(AuthError::PlatformUnsupported(format!(
                "local listener can only serve http redirect URIs, got {}",
                url.scheme()
            )));
        }
        let port = url
            .port_or_known_default()
            .ok_or_else(|| AuthError::Configuration("redirect URI has no port".to_string()))?;

        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|e| {
                AuthError::PlatformUnsupported(format!("failed to bind port {port}: {e}"))
            })?;
        let local_addr = listener.local_addr().map_err(|e| {
            AuthError::PlatformUnsupported(format!("failed to read local address: {e}"))
        })?;

        let (result_tx, result_rx) = oneshot::channel();
        let route = CallbackRoute {
            path: Arc::from(url.path()),
            slot: Arc::new(Mutex::new(Some(result_tx))),
        };
        let app = Router::new().fallback(handle_callback).with_state(route);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                tracing::error!(error = %err, "OAuth callback listener failed");
            }
        });

        tracing::info!(%local_addr, path = url.path(), "OAuth callback listener bound");

        Ok(Self {
            local_addr,
            result_rx: Some(result_rx),
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_serving(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the first redirect. Resolves once per listener.
    pub async fn wait_for_callback(&mut self) -> Result<CallbackResult, AuthError> {
        let rx = self.result_rx.take().ok_or_else(|| {
            AuthError::AuthorizationDenied("callback already consumed".to_string())
        })?;
        rx.await.map_err(|_| {
            AuthError::AuthorizationDenied(
                "callback listener stopped before a redirect arrived".to_string(),
            )
        })
    }

    /// Stop serving and release the port. Returns once the socket is closed.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(mut handle) = self.handle.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
                tracing::warn!("OAuth callback listener did not drain in time, aborting");
                handle.abort();
                let _ = handle.await;
            }
        }
        tracing::info!(local_addr = %self.local_addr, "OAuth callback listener stopped");
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

async fn handle_callback(
    State(route): State<CallbackRoute>,
    uri: Uri,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Response {
    if uri.path() != &*route.path {
        return StatusCode::NOT_FOUND.into_response();
    }

    let params = query.map(|Query(params)| params).unwrap_or_default();
    let result = CallbackResult::from_query(&params);

    let sender = route.slot.lock().ok().and_then(|mut guard| guard.take());
    match sender {
        Some(tx) => {
            tracing::debug!(
                has_code = result.authorization_code.is_some(),
                error = ?result.error,
                "OAuth redirect received"
            );
            let _ = tx.send(result);
        }
        None => tracing::debug!("ignoring repeated OAuth redirect"),
    }

    ([(header::CONNECTION, "close")], Html(CONFIRMATION_PAGE)).into_response()
}
