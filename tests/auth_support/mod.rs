#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bim_setup::auth::{AuthorizationCoordinator, AuthorizationRequest, BrowserLauncher};
use reqwest::Url;
use wiremock::MockServer;

pub const TOKEN_PATH: &str = "/authentication/v1/gettoken";
pub const AUTHORIZE_PATH: &str = "/authentication/v1/authorize";

/// What the simulated user does once the authorization page opens.
#[derive(Debug, Clone, Copy)]
pub enum UserAction {
    /// Approve; the provider redirects back with this code.
    Approve(&'static str),
    /// Decline; the provider redirects back with `error=<reason>`.
    Decline(&'static str),
    /// Redirect back with no parameters at all.
    EmptyRedirect,
    /// Redirect back with a code but someone else's state.
    ForeignState(&'static str),
    /// Never complete the flow.
    WalkAway,
}

/// Stands in for the system browser by issuing the provider's redirect
/// against the local callback listener.
pub struct FakeBrowser {
    action: UserAction,
    launches: AtomicUsize,
    last_url: Mutex<Option<String>>,
    client: reqwest::Client,
}

impl FakeBrowser {
    pub fn new(action: UserAction) -> Arc<Self> {
        Arc::new(Self {
            action,
            launches: AtomicUsize::new(0),
            last_url: Mutex::new(None),
            client: reqwest::Client::builder()
                .pool_max_idle_per_host(0)
                .build()
                .expect("build browser client"),
        })
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<Url> {
        self.last_url
            .lock()
            .expect("browser lock poisoned")
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self, url: &str) -> io::Result<()> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().expect("browser lock poisoned") = Some(url.to_string());

        let parsed = Url::parse(url).map_err(io::Error::other)?;
        let params: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        let redirect_uri = params
            .get("redirect_uri")
            .ok_or_else(|| io::Error::other("authorization URL has no redirect_uri"))?;
        let state = params.get("state").cloned().unwrap_or_default();

        let query: Vec<(&str, String)> = match self.action {
            UserAction::Approve(code) => vec![("code", code.to_string()), ("state", state)],
            UserAction::Decline(reason) => vec![("error", reason.to_string()), ("state", state)],
            UserAction::EmptyRedirect => Vec::new(),
            UserAction::ForeignState(code) => {
                vec![("code", code.to_string()), ("state", "not-ours".to_string())]
            }
            UserAction::WalkAway => return Ok(()),
        };

        let response = self
            .client
            .get(redirect_uri)
            .query(&query)
            .send()
            .await
            .map_err(io::Error::other)?;
        assert_eq!(response.status(), 200, "callback page must always answer 200");
        Ok(())
    }
}

/// A port nothing is listening on right now.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind(("127.0.0.1", 0))
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("reserve a local port")
}

pub fn redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{port}/oauth")
}

pub fn coordinator(
    server: &MockServer,
    port: u16,
    browser: Arc<FakeBrowser>,
) -> AuthorizationCoordinator {
    AuthorizationCoordinator::new(
        AuthorizationRequest::new("client-1", "secret-1", redirect_uri(port)),
        format!("{}{AUTHORIZE_PATH}", server.uri()),
        format!("{}{TOKEN_PATH}", server.uri()),
    )
    .with_browser(browser)
    .with_timeout(Some(Duration::from_secs(10)))
}

/// True once something can bind the callback port again.
pub async fn port_is_free(port: u16) -> bool {
    tokio::net::TcpListener::bind(("0.0.0.0", port)).await.is_ok()
}
