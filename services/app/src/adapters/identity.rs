//! services/app/src/adapters/identity.rs
//!
//! This module contains the local identity provider.
//! It implements the `IdentityService` port from the `core` crate, holding
//! email/password accounts and the current session on disk so a sign-in
//! survives process restarts the way a provider-managed browser session
//! would. Session changes fan out over a broadcast channel; every
//! subscriber gets the current state replayed as its first event.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use plastivize_core::domain::Identity;
use plastivize_core::ports::{IdentityService, PortError, PortResult, SessionEvent, SessionStream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::error;
use uuid::Uuid;

const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session.json";
const SESSION_TTL_DAYS: i64 = 30;

//=========================================================================================
// Stored Records
//=========================================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountBook {
    /// email -> argon2 password hash
    accounts: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    token: String,
    email: String,
    expires_at: DateTime<Utc>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed identity provider with broadcast session notifications.
#[derive(Clone)]
pub struct LocalIdentityAdapter {
    data_dir: PathBuf,
    events: broadcast::Sender<SessionEvent>,
}

impl LocalIdentityAdapter {
    /// Creates a new `LocalIdentityAdapter` rooted at `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(data_dir)?;
        let (events, _) = broadcast::channel(16);
        Ok(Self { data_dir: data_dir.to_path_buf(), events })
    }

    /// Registers a new account and signs it in. The fresh session is
    /// broadcast to subscribers, matching providers that treat account
    /// creation as an implicit sign-in.
    pub async fn sign_up(&self, email: &str, password: &str) -> PortResult<Identity> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(PortError::Unexpected(
                "Please enter email and password.".to_string(),
            ));
        }
        if password.len() < 6 {
            return Err(PortError::Unexpected(
                "Password should be at least 6 characters.".to_string(),
            ));
        }

        let mut book = self.load_accounts().await?;
        if book.accounts.contains_key(email) {
            return Err(PortError::Unexpected(
                "An account with this email already exists.".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {e}")))?
            .to_string();
        book.accounts.insert(email.to_string(), password_hash);
        self.save_accounts(&book).await?;

        self.open_session(email).await
    }

    /// Verifies credentials and starts a session. Unknown emails and wrong
    /// passwords are reported identically.
    pub async fn sign_in(&self, email: &str, password: &str) -> PortResult<Identity> {
        let email = email.trim();
        let book = self.load_accounts().await?;
        let Some(stored_hash) = book.accounts.get(email) else {
            return Err(PortError::Unauthorized);
        };

        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| PortError::Unexpected(format!("Failed to parse password hash: {e}")))?;
        let valid = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();
        if !valid {
            return Err(PortError::Unauthorized);
        }

        self.open_session(email).await
    }

    /// The identity of the current non-expired session record, if any.
    pub async fn current_session(&self) -> Option<Identity> {
        let raw = tokio::fs::read_to_string(self.data_dir.join(SESSION_FILE)).await.ok()?;
        let session: StoredSession = serde_json::from_str(&raw).ok()?;
        if session.expires_at <= Utc::now() {
            return None;
        }
        Some(Identity { email: Some(session.email) })
    }

    async fn open_session(&self, email: &str) -> PortResult<Identity> {
        let session = StoredSession {
            token: Uuid::new_v4().to_string(),
            email: email.to_string(),
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        };
        let raw = serde_json::to_string_pretty(&session)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.write_file_atomic(SESSION_FILE, &raw).await?;

        let identity = Identity { email: Some(email.to_string()) };
        // Nobody listening is fine; the next subscriber replays current state.
        let _ = self.events.send(SessionEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn load_accounts(&self) -> PortResult<AccountBook> {
        match tokio::fs::read_to_string(self.data_dir.join(ACCOUNTS_FILE)).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| PortError::Unexpected(format!("Account file is unreadable: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AccountBook::default()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    async fn save_accounts(&self, book: &AccountBook) -> PortResult<()> {
        let raw = serde_json::to_string_pretty(book)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.write_file_atomic(ACCOUNTS_FILE, &raw).await
    }

    async fn write_file_atomic(&self, name: &str, contents: &str) -> PortResult<()> {
        let path = self.data_dir.join(name);
        let tmp_path = self.data_dir.join(format!("{name}.tmp"));
        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `IdentityService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdentityService for LocalIdentityAdapter {
    async fn subscribe_session_changes(&self) -> PortResult<SessionStream> {
        // Snapshot the current state and register the receiver up front, so
        // nothing sent between subscribing and the first poll can be lost.
        let initial = match self.current_session().await {
            Some(identity) => SessionEvent::SignedIn(identity),
            None => SessionEvent::SignedOut,
        };
        let mut rx = self.events.subscribe();

        Ok(Box::pin(async_stream::stream! {
            yield initial;
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        error!("session event stream lagged, skipped {skipped} events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }))
    }

    async fn sign_out(&self) -> PortResult<()> {
        match tokio::fs::remove_file(self.data_dir.join(SESSION_FILE)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        }
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::TempDir;

    fn adapter() -> (TempDir, LocalIdentityAdapter) {
        let dir = TempDir::new().unwrap();
        let adapter = LocalIdentityAdapter::new(dir.path()).unwrap();
        (dir, adapter)
    }

    #[tokio::test]
    async fn sign_up_opens_a_session_and_sign_in_round_trips() {
        let (_dir, identity) = adapter();

        let created = identity.sign_up("a@b.com", "hunter22").await.unwrap();
        assert_eq!(created.email.as_deref(), Some("a@b.com"));
        assert!(identity.current_session().await.is_some());

        identity.sign_out().await.unwrap();
        assert!(identity.current_session().await.is_none());

        let signed_in = identity.sign_in("a@b.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let (_dir, identity) = adapter();
        identity.sign_up("a@b.com", "hunter22").await.unwrap();

        assert!(matches!(
            identity.sign_in("a@b.com", "wrong").await,
            Err(PortError::Unauthorized)
        ));
        assert!(matches!(
            identity.sign_in("nobody@b.com", "hunter22").await,
            Err(PortError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let (_dir, identity) = adapter();
        identity.sign_up("a@b.com", "hunter22").await.unwrap();
        assert!(identity.sign_up("a@b.com", "other-password").await.is_err());
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (_dir, identity) = adapter();
        assert!(identity.sign_up("a@b.com", "tiny").await.is_err());
    }

    #[tokio::test]
    async fn subscription_replays_current_state_then_live_events() {
        let (_dir, identity) = adapter();

        let mut events = identity.subscribe_session_changes().await.unwrap();
        assert_eq!(events.next().await, Some(SessionEvent::SignedOut));

        identity.sign_up("a@b.com", "hunter22").await.unwrap();
        let event = events.next().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::SignedIn(Identity { email: Some("a@b.com".to_string()) })
        );

        identity.sign_out().await.unwrap();
        assert_eq!(events.next().await, Some(SessionEvent::SignedOut));
    }

    #[tokio::test]
    async fn persisted_session_is_replayed_to_a_new_subscriber() {
        let (_dir, identity) = adapter();
        identity.sign_up("a@b.com", "hunter22").await.unwrap();

        let mut events = identity.subscribe_session_changes().await.unwrap();
        assert_eq!(
            events.next().await,
            Some(SessionEvent::SignedIn(Identity { email: Some("a@b.com".to_string()) }))
        );
    }

    #[tokio::test]
    async fn expired_session_counts_as_signed_out() {
        let (dir, identity) = adapter();
        let stale = StoredSession {
            token: Uuid::new_v4().to_string(),
            email: "a@b.com".to_string(),
            expires_at: Utc::now() - Duration::days(1),
        };
        std::fs::write(
            dir.path().join(SESSION_FILE),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        assert!(identity.current_session().await.is_none());
        let mut events = identity.subscribe_session_changes().await.unwrap();
        assert_eq!(events.next().await, Some(SessionEvent::SignedOut));
    }
}
