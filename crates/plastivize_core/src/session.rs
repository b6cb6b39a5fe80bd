//! crates/plastivize_core/src/session.rs
//!
//! Bridges identity-provider session events into the progression store.
//! The application subscribes to the provider once at startup and feeds
//! each event through [`SessionBinder::apply`].

use std::sync::Arc;

use tracing::info;

use crate::persistence::PersistenceAdapter;
use crate::ports::SessionEvent;
use crate::store::ProgressionStore;

/// Shown when the provider has no email for the signed-in identity.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

pub struct SessionBinder {
    persistence: Arc<PersistenceAdapter>,
}

impl SessionBinder {
    pub fn new(persistence: Arc<PersistenceAdapter>) -> Self {
        Self { persistence }
    }

    /// Applies one session transition and re-syncs persistence: a sign-in
    /// adopts the identity's display name over whatever aggregate is held
    /// (persisted progress survives a session restore), a sign-out resets to
    /// the anonymous aggregate and thereby clears the stored record.
    pub async fn apply(&self, store: &mut ProgressionStore, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn(identity) => {
                let display_name = identity
                    .email
                    .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
                info!("session active for {display_name}");
                store.begin_session(&display_name);
            }
            SessionEvent::SignedOut => {
                info!("session ended, resetting to anonymous state");
                store.reset();
            }
        }
        self.persistence.sync(store.data()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, UserData, UserStats};
    use crate::ports::{PortResult, StateStorage};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        slots: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl StateStorage for MemoryStorage {
        async fn get(&self, key: &str) -> PortResult<Option<String>> {
            Ok(self.slots.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> PortResult<()> {
            self.slots.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> PortResult<()> {
            self.slots.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn restored_aggregate() -> UserData {
        UserData {
            stats: UserStats { items_scanned: 5, co2_saved: 3.0, eco_points: 50 },
            username: Some("a@b.com".to_string()),
            ..UserData::default()
        }
    }

    #[tokio::test]
    async fn sign_in_adopts_email_and_keeps_progress() {
        let storage = Arc::new(MemoryStorage::default());
        let binder = SessionBinder::new(Arc::new(PersistenceAdapter::new(storage.clone())));
        let mut store = ProgressionStore::initialize(Some(restored_aggregate()));

        let identity = Identity { email: Some("fresh@b.com".to_string()) };
        binder.apply(&mut store, SessionEvent::SignedIn(identity)).await;

        assert_eq!(store.data().username.as_deref(), Some("fresh@b.com"));
        assert_eq!(store.data().stats.items_scanned, 5);
        assert!(storage.slots.lock().unwrap().contains_key(crate::persistence::STORAGE_KEY));
    }

    #[tokio::test]
    async fn sign_in_without_email_uses_the_placeholder() {
        let storage = Arc::new(MemoryStorage::default());
        let binder = SessionBinder::new(Arc::new(PersistenceAdapter::new(storage)));
        let mut store = ProgressionStore::default();

        binder
            .apply(&mut store, SessionEvent::SignedIn(Identity { email: None }))
            .await;
        assert_eq!(store.data().username.as_deref(), Some(DEFAULT_DISPLAY_NAME));
        assert_eq!(store.data().stats.items_scanned, 0);
    }

    #[tokio::test]
    async fn sign_out_resets_and_clears_the_stored_record() {
        let storage = Arc::new(MemoryStorage::default());
        let binder = SessionBinder::new(Arc::new(PersistenceAdapter::new(storage.clone())));
        let mut store = ProgressionStore::initialize(Some(restored_aggregate()));

        // Simulate the mirror a signed-in session would have left behind.
        binder
            .apply(
                &mut store,
                SessionEvent::SignedIn(Identity { email: Some("a@b.com".to_string()) }),
            )
            .await;
        assert!(!storage.slots.lock().unwrap().is_empty());

        binder.apply(&mut store, SessionEvent::SignedOut).await;
        assert_eq!(store.data(), &UserData::default());
        assert!(storage.slots.lock().unwrap().is_empty());
    }
}
