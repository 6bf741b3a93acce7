//! Tests for configuration loading.

use std::io::Write;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use bim_setup::config::SetupConfig;
use bim_setup::error::SetupError;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 10] = [
    "FORGE_CLIENT_ID",
    "FORGE_CLIENT_SECRET",
    "FORGE_CALLBACK_URL",
    "FORGE_BASE_URL",
    "FORGE_AUTHORIZE_URL",
    "FORGE_TOKEN_URL",
    "FORGE_ACCESS_TOKEN",
    "BIM_SETUP_PAGE_SIZE",
    "BIM_SETUP_TOKEN_FRESHNESS_SECS",
    "BIM_SETUP_AUTH_TIMEOUT_SECS",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clean_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn from_env_reads_credentials_and_tuning() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    std::env::set_var("FORGE_CLIENT_ID", "env-id");
    std::env::set_var("FORGE_CLIENT_SECRET", "env-secret");
    std::env::set_var("FORGE_CALLBACK_URL", "http://localhost:4000/callback");
    std::env::set_var("BIM_SETUP_TOKEN_FRESHNESS_SECS", "60");
    std::env::set_var("BIM_SETUP_AUTH_TIMEOUT_SECS", "45");

    let config = SetupConfig::from_env().expect("config");

    assert_eq!(config.client_id, "env-id");
    assert_eq!(config.client_secret, "env-secret");
    assert_eq!(config.callback_url, "http://localhost:4000/callback");
    assert_eq!(config.freshness_window(), Duration::from_secs(60));
    assert_eq!(config.acquisition_timeout(), Some(Duration::from_secs(45)));
    config.validate().expect("valid");
}

#[test]
fn from_env_without_credentials_fails_validation() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let config = SetupConfig::from_env().expect("defaults load");
    let err = config.validate().expect_err("missing client id");

    assert!(matches!(err, SetupError::Configuration(_)));
    assert!(err.to_string().contains("FORGE_CLIENT_ID"));
}

#[test]
fn from_env_rejects_non_numeric_page_size() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    std::env::set_var("BIM_SETUP_PAGE_SIZE", "a hundred");
    let err = SetupConfig::from_env().expect_err("bad number");
    assert!(matches!(err, SetupError::Configuration(_)));
}

#[test]
fn load_layers_environment_over_file() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
client_id = "file-id"
client_secret = "file-secret"
base_url = "http://localhost:7000"
page_size = 50
"#
    )
    .expect("write config");

    std::env::set_var("FORGE_CLIENT_ID", "env-id");

    let config = SetupConfig::load(Some(file.path())).expect("config");

    assert_eq!(config.client_id, "env-id");
    assert_eq!(config.client_secret, "file-secret");
    assert_eq!(config.page_size, 50);
    assert_eq!(
        config.authorize_endpoint(),
        "http://localhost:7000/authentication/v1/authorize"
    );
}

#[test]
fn load_reports_missing_file_as_io_error() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");
    let err = SetupConfig::load(Some(missing.as_path())).expect_err("no file");
    assert!(matches!(err, SetupError::Io(_)));
}

#[test]
fn malformed_toml_is_configuration_error() {
    let err = SetupConfig::from_toml_str("page_size = \"many\"").expect_err("wrong type");
    assert!(matches!(err, SetupError::Configuration(_)));
}

#[test]
fn seeded_token_and_disabled_timeout_reach_coordinator() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    std::env::set_var("FORGE_CLIENT_ID", "id");
    std::env::set_var("FORGE_CLIENT_SECRET", "secret");
    std::env::set_var("FORGE_ACCESS_TOKEN", "pre-issued");
    std::env::set_var("BIM_SETUP_AUTH_TIMEOUT_SECS", "0");

    let config = SetupConfig::from_env().expect("config");
    assert_eq!(config.acquisition_timeout(), None);

    let coordinator = config.coordinator().expect("coordinator");
    let credential = coordinator.store().current().expect("seeded credential");
    assert_eq!(credential.access_token, "pre-issued");
    assert_eq!(coordinator.request().client_id, "id");
}
