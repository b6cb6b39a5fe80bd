//! crates/plastivize_core/src/persistence.rs
//!
//! Keeps a durable mirror of the aggregate, scoped to signed-in sessions:
//! after every change the full aggregate is written under one fixed key
//! while a user is signed in, and the key is removed while anonymous.
//! Storage trouble is logged and absorbed here; it never reaches the user.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::UserData;
use crate::ports::StateStorage;

/// The one logical slot the aggregate lives under.
pub const STORAGE_KEY: &str = "plastivize_userdata";

pub struct PersistenceAdapter {
    storage: Arc<dyn StateStorage>,
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    /// Reads the persisted aggregate, if any. An absent key, a failing read,
    /// and an unparseable document all come back as `None` - the stored
    /// record carries no version field, so shape drift is treated as "no
    /// prior state" rather than an error.
    pub async fn load(&self) -> Option<UserData> {
        let raw = match self.storage.get(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read persisted user data: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("persisted user data is unreadable, starting fresh: {e}");
                None
            }
        }
    }

    /// Mirrors the aggregate to storage. Failures are logged and swallowed;
    /// the in-memory session keeps going either way.
    pub async fn sync(&self, data: &UserData) {
        let result = if data.is_logged_in() {
            // Pretty-printed so the stored record stays human-inspectable.
            match serde_json::to_string_pretty(data) {
                Ok(raw) => self.storage.set(STORAGE_KEY, &raw).await,
                Err(e) => {
                    error!("failed to serialize user data: {e}");
                    return;
                }
            }
        } else {
            self.storage.remove(STORAGE_KEY).await
        };
        if let Err(e) = result {
            error!("failed to persist user data: {e}");
        }
    }
}
