//! Convenience re-exports for common use.

pub use crate::auth::{
    AcquisitionState, AuthError, AuthorizationCoordinator, AuthorizationRequest, Credential,
    Scope, TokenProvider, TokenStore,
};
pub use crate::config::SetupConfig;
pub use crate::error::{Result, SetupError};
pub use crate::resource::{PathParams, ResourceClient, ResourceTemplate};
pub use crate::workflow::{create_each, BatchReport};
