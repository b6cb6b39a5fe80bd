//! services/app/src/session.rs
//!
//! This module contains the asynchronous "worker" function that binds the
//! identity provider's session stream to the progression store.

use futures::StreamExt;
use plastivize_core::{ports::IdentityService, session::SessionBinder};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::state::SharedStore;

/// The long-running session binder task.
///
/// Subscribes exactly once to the provider's session-change stream and applies
/// every event to the store (adopting the identity on sign-in, resetting on
/// sign-out), persisting after each change. It is designed to be gracefully
/// cancelled via a `CancellationToken` at shutdown.
///
/// An unavailable provider is not an error: the task logs a warning and ends,
/// leaving the engine fully usable without session binding.
pub async fn session_binder_process(
    identity: Arc<dyn IdentityService>,
    binder: SessionBinder,
    store: SharedStore,
    cancellation_token: CancellationToken,
) {
    let mut events = match identity.subscribe_session_changes().await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Session subscription unavailable, continuing without it: {e}");
            return;
        }
    };
    info!("Session binder started.");

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Session binder cancelled.");
                return;
            }
            event = events.next() => {
                match event {
                    Some(event) => {
                        let mut guard = store.lock().await;
                        binder.apply(&mut guard, event).await;
                    }
                    None => {
                        info!("Session stream ended.");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::LocalIdentityAdapter;
    use crate::adapters::storage::FileStorageAdapter;
    use plastivize_core::persistence::PersistenceAdapter;
    use plastivize_core::store::ProgressionStore;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn binder_applies_provider_events_to_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorageAdapter::new(&dir.path().join("state")).unwrap());
        let persistence = Arc::new(PersistenceAdapter::new(storage));
        let auth = Arc::new(LocalIdentityAdapter::new(dir.path()).unwrap());
        let store: SharedStore = Arc::new(Mutex::new(ProgressionStore::default()));
        let token = CancellationToken::new();

        let worker = tokio::spawn(session_binder_process(
            auth.clone() as Arc<dyn IdentityService>,
            SessionBinder::new(persistence),
            store.clone(),
            token.clone(),
        ));

        auth.sign_up("a@b.com", "secret1").await.unwrap();

        // The worker applies the broadcast shortly after; poll for it.
        let mut signed_in = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if store.lock().await.is_logged_in() {
                signed_in = true;
                break;
            }
        }
        assert!(signed_in);
        assert_eq!(
            store.lock().await.data().username.as_deref(),
            Some("a@b.com")
        );

        auth.sign_out().await.unwrap();
        let mut signed_out = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if !store.lock().await.is_logged_in() {
                signed_out = true;
                break;
            }
        }
        assert!(signed_out);

        token.cancel();
        worker.await.unwrap();
    }
}
