//! bim-setup: authorization and resource access for BIM 360 setup tooling.
//!
//! Two pieces do the work: an [`auth::AuthorizationCoordinator`] that runs the
//! OAuth2 authorization-code grant through the user's browser and caches the
//! bearer credential, and a [`resource::ResourceClient`] that reads and writes
//! templated REST collections with it.
//!
//! # Quick Start
//!
//! ```no_run
//! use bim_setup::config::SetupConfig;
//! use bim_setup::resource::{PathParams, ResourceTemplate};
//!
//! # async fn example() -> bim_setup::error::Result<()> {
//! let config = SetupConfig::from_env()?;
//! let coordinator = config.coordinator()?;
//! let client =
//!     bim_setup::workflow::connect(&coordinator, &config.base_url, config.page_size).await?;
//!
//! let segments = ResourceTemplate::new(
//!     "cost/v1/containers/{ContainerId}/templates/{TemplateId}/segments",
//! )?;
//! let params = PathParams::new().with("ContainerId", "c-1").with("TemplateId", "t-1");
//! let all: Vec<serde_json::Value> = client.fetch_all(&segments, &params).await?;
//! println!("{} segments", all.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
pub mod resource;
pub mod serde_date;
pub mod workflow;

#[cfg(feature = "cli")]
pub mod cli;
