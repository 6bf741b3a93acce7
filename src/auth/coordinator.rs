//! Interactive authorization-code acquisition.
//!
//! One [`AuthorizationCoordinator`] owns the credential cache and the state of
//! at most one acquisition at a time. The acquisition itself runs on a spawned
//! task: it waits for the browser redirect, exchanges the code, stops the
//! callback listener and only then publishes a terminal state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use super::browser::{BrowserLauncher, SystemBrowser};
use super::callback::CallbackListener;
use super::error::AuthError;
use super::exchange::TokenExchanger;
use super::request::AuthorizationRequest;
use super::store::TokenStore;
use super::token::Credential;

/// Default bound on how long one acquisition may wait for the user.
pub const DEFAULT_ACQUISITION_TIMEOUT: Duration = Duration::from_secs(300);

/// Progress of the current (or last) acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AcquisitionState {
    #[default]
    Idle,
    ListenerStarting,
    AwaitingRedirect,
    ExchangingToken,
    Ready,
    Failed(AuthError),
}

impl AcquisitionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::ListenerStarting | Self::AwaitingRedirect | Self::ExchangingToken
        )
    }
}

/// Source of bearer credentials for resource calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<Credential, AuthError>;
}

/// Always hands out the same credential. Used when a token is supplied
/// up front and no browser is available.
#[derive(Debug, Clone)]
pub struct StaticToken(pub Credential);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Result<Credential, AuthError> {
        Ok(self.0.clone())
    }
}

/// Runs the authorization-code grant and caches the resulting credential.
///
/// Cloning is cheap; clones share the same store and acquisition state.
#[derive(Clone)]
pub struct AuthorizationCoordinator {
    request: AuthorizationRequest,
    authorize_url: String,
    exchanger: TokenExchanger,
    browser: Arc<dyn BrowserLauncher>,
    store: Arc<TokenStore>,
    state: Arc<watch::Sender<AcquisitionState>>,
    timeout: Option<Duration>,
}

impl fmt::Debug for AuthorizationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCoordinator")
            .field("client_id", &self.request.client_id)
            .field("redirect_uri", &self.request.redirect_uri)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.exchanger.token_url())
            .field("state", &*self.state.borrow())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AuthorizationCoordinator {
    pub fn new(
        request: AuthorizationRequest,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(AcquisitionState::Idle);
        Self {
            request,
            authorize_url: authorize_url.into(),
            exchanger: TokenExchanger::new(reqwest::Client::new(), token_url),
            browser: Arc::new(SystemBrowser),
            store: Arc::new(TokenStore::default()),
            state: Arc::new(state),
            timeout: Some(DEFAULT_ACQUISITION_TIMEOUT),
        }
    }

    pub fn with_browser(mut self, browser: Arc<dyn BrowserLauncher>) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_store(mut self, store: TokenStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// `None` waits for the user indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.exchanger = TokenExchanger::new(client, self.exchanger.token_url().to_string());
        self
    }

    pub fn request(&self) -> &AuthorizationRequest {
        &self.request
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn state(&self) -> AcquisitionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.state.subscribe()
    }

    /// Bind the callback listener, open the authorization URL and return.
    ///
    /// Completion happens in the background; observe it through
    /// [`Self::state`], [`Self::subscribe`] or [`Self::get_token`]. A call
    /// made while another acquisition is in flight joins that one.
    pub async fn start_acquisition(&self, request: AuthorizationRequest) -> Result<(), AuthError> {
        let claimed = self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                false
            } else {
                *state = AcquisitionState::ListenerStarting;
                true
            }
        });
        if !claimed {
            tracing::debug!("authorization already in flight");
            return Ok(());
        }

        let listener = match CallbackListener::bind(&request.redirect_uri).await {
            Ok(listener) => listener,
            Err(err) => {
                self.publish(Err(err.clone()));
                return Err(err);
            }
        };

        let csrf_state = Uuid::new_v4().to_string();
        let url = match request.authorization_url(&self.authorize_url, &csrf_state) {
            Ok(url) => url,
            Err(err) => {
                listener.shutdown().await;
                self.publish(Err(err.clone()));
                return Err(err);
            }
        };

        self.state.send_replace(AcquisitionState::AwaitingRedirect);
        tracing::info!(redirect_uri = %request.redirect_uri, "waiting for authorization redirect");
        let this = self.clone();
        tokio::spawn(async move {
            this.complete(listener, request, csrf_state).await;
        });

        tracing::info!("opening browser for authorization");
        if let Err(err) = self.browser.launch(url.as_str()).await {
            tracing::warn!(error = %err, %url, "failed to open browser, visit the URL manually");
        }
        Ok(())
    }

    /// Cached credential if fresh, otherwise wait for a new acquisition.
    pub async fn get_token(&self) -> Result<Credential, AuthError> {
        if let Some(credential) = self.store.current() {
            return Ok(credential);
        }

        self.start_acquisition(self.request.clone()).await?;

        let mut rx = self.state.subscribe();
        let terminal = rx
            .wait_for(AcquisitionState::is_terminal)
            .await
            .map_err(|_| AuthError::AuthorizationDenied("coordinator shut down".to_string()))?
            .clone();

        match terminal {
            AcquisitionState::Failed(err) => Err(err),
            _ => self.store.latest().ok_or_else(|| {
                AuthError::AuthorizationDenied("no credential stored after acquisition".to_string())
            }),
        }
    }

    async fn complete(
        self,
        mut listener: CallbackListener,
        request: AuthorizationRequest,
        csrf_state: String,
    ) {
        let flow = async {
            let callback = listener.wait_for_callback().await?;
            let code = callback.into_code(&csrf_state)?;
            self.state.send_replace(AcquisitionState::ExchangingToken);
            self.exchanger.exchange(&request, &code).await
        };

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, flow)
                .await
                .unwrap_or(Err(AuthError::TimedOut(limit))),
            None => flow.await,
        };

        listener.shutdown().await;
        self.publish(outcome);
    }

    fn publish(&self, outcome: Result<Credential, AuthError>) {
        match outcome {
            Ok(credential) => {
                self.store.replace(credential);
                tracing::info!("authorization complete, token acquired");
                self.state.send_replace(AcquisitionState::Ready);
            }
            Err(err) => {
                tracing::warn!(error = %err, "authorization failed");
                self.state.send_replace(AcquisitionState::Failed(err));
            }
        }
    }
}

#[async_trait]
impl TokenProvider for AuthorizationCoordinator {
    async fn bearer_token(&self) -> Result<Credential, AuthError> {
        self.get_token().await
    }
}
