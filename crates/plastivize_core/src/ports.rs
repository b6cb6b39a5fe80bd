//! crates/plastivize_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like storage
//! backends, identity providers, or AI APIs.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::{Identity, PlasticClassification, ReuseIdea};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., storage, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Session Events
//=========================================================================================

/// One notification from the identity provider's session stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Identity),
    SignedOut,
}

/// The stream handed out by [`IdentityService::subscribe_session_changes`].
/// Implementations replay the current session state as the first item.
pub type SessionStream = Pin<Box<dyn Stream<Item = SessionEvent> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Keyed blob storage for the persisted aggregate. The adapter decides where
/// a key physically lives; the core only reads and writes serialized text.
#[async_trait]
pub trait StateStorage: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// The slice of an identity provider the engine needs: session-change
/// notifications and a sign-out action. Account creation and sign-in are
/// front-end glue and stay on the concrete adapter.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn subscribe_session_changes(&self) -> PortResult<SessionStream>;

    async fn sign_out(&self) -> PortResult<()>;
}

#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Identifies the plastic in a scanned image.
    async fn classify_item(&self, image_data: &[u8], mime_type: &str)
        -> PortResult<PlasticClassification>;
}

#[async_trait]
pub trait ReuseIdeaService: Send + Sync {
    /// Suggests creative reuse ideas for a plastic-type label, as reported
    /// by the classifier.
    async fn suggest_reuse_ideas(&self, plastic_type: &str) -> PortResult<Vec<ReuseIdea>>;
}
