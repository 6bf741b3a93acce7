//! OAuth2 authorization-code flow and credential caching.

pub mod browser;
pub mod callback;
pub mod coordinator;
pub mod error;
pub mod exchange;
pub mod request;
pub mod store;
pub mod token;

pub use browser::{BrowserLauncher, PrintUrl, SystemBrowser};
pub use callback::{CallbackListener, CallbackResult};
pub use coordinator::{
    AcquisitionState, AuthorizationCoordinator, StaticToken, TokenProvider,
    DEFAULT_ACQUISITION_TIMEOUT,
};
pub use error::AuthError;
pub use exchange::TokenExchanger;
pub use request::{AuthorizationRequest, Scope};
pub use store::{TokenStore, DEFAULT_FRESHNESS_WINDOW};
pub use token::Credential;
