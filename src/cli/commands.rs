//! CLI command handlers for login, fetch, and get.

use std::path::Path;
use std::sync::Arc;

use crate::auth::{AuthorizationCoordinator, PrintUrl};
use crate::config::SetupConfig;
use crate::resource::{PathParams, ResourceTemplate};
use crate::workflow;

type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn coordinator(
    config_path: Option<&Path>,
    no_browser: bool,
) -> CommandResult<(SetupConfig, AuthorizationCoordinator)> {
    let config = SetupConfig::load(config_path)?;
    let mut coordinator = config.coordinator()?;
    if no_browser {
        coordinator = coordinator.with_browser(Arc::new(PrintUrl));
    }
    Ok((config, coordinator))
}

/// Handle `bim-setup login`.
pub async fn handle_login(config_path: Option<&Path>, no_browser: bool) -> CommandResult {
    let (_, coordinator) = coordinator(config_path, no_browser)?;

    println!("Waiting for authorization in the browser...");
    let credential = coordinator.get_token().await?;
    println!("Logged in, token acquired at {}", credential.acquired_at.to_rfc3339());
    if let Some(expires_in) = credential.expires_in {
        println!("Provider lifetime: {expires_in}s");
    }
    Ok(())
}

/// Handle `bim-setup fetch <template>` and `bim-setup get <template>`.
pub async fn handle_read(
    config_path: Option<&Path>,
    no_browser: bool,
    template: &str,
    params: &[(String, String)],
    all_pages: bool,
) -> CommandResult {
    let (config, coordinator) = coordinator(config_path, no_browser)?;
    let template = ResourceTemplate::new(template)?;
    let params: PathParams = params.iter().cloned().collect();

    let client = workflow::connect(&coordinator, &config.base_url, config.page_size).await?;
    let value = if all_pages {
        serde_json::Value::Array(client.fetch_all(&template, &params).await?)
    } else {
        client.get::<serde_json::Value>(&template, &params).await?
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
