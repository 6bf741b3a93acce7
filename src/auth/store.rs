use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::token::Credential;

/// Default reuse window for an acquired credential.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(30 * 60);

/// In-memory holder of the single live credential.
///
/// Never persisted; a new process always starts empty (or seeded from
/// configuration). A credential older than the freshness window is reported
/// as absent.
#[derive(Debug)]
pub struct TokenStore {
    window: Duration,
    slot: Mutex<Option<Credential>>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_WINDOW)
    }
}

impl TokenStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: Mutex::new(None),
        }
    }

    pub fn freshness_window(&self) -> Duration {
        self.window
    }

    /// Usable credential, if one is held and still fresh.
    pub fn current(&self) -> Option<Credential> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Credential> {
        let guard = self.slot.lock().ok()?;
        guard
            .as_ref()
            .filter(|credential| credential.is_fresh_at(self.window, now))
            .cloned()
    }

    /// Most recently stored credential, ignoring freshness.
    pub fn latest(&self) -> Option<Credential> {
        self.slot.lock().ok()?.clone()
    }

    /// Overwrite the held credential.
    pub fn replace(&self, credential: Credential) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = Some(credential);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = None;
        }
    }
}
