//! services/app/src/state.rs
//!
//! Defines the application's shared state and the single-writer handle to
//! the progression store.

use crate::adapters::identity::LocalIdentityAdapter;
use crate::config::Config;
use plastivize_core::persistence::PersistenceAdapter;
use plastivize_core::ports::{ClassificationService, IdentityService, ReuseIdeaService};
use plastivize_core::store::ProgressionStore;
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Commands)
//=========================================================================================

/// The shared application state, created once at startup and passed to all
/// command handlers. The optional adapters reflect degraded modes: no
/// identity provider means auth is disabled, no API key means scanning is
/// disabled.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persistence: Arc<PersistenceAdapter>,
    pub identity: Option<Arc<dyn IdentityService>>,
    /// The concrete identity adapter, kept alongside the port for the
    /// sign-up/sign-in surface the port deliberately leaves out.
    pub auth: Option<Arc<LocalIdentityAdapter>>,
    pub classifier: Option<Arc<dyn ClassificationService>>,
    pub ideas: Option<Arc<dyn ReuseIdeaService>>,
}

/// The one handle through which the aggregate is ever mutated. Store methods
/// are synchronous, so each operation completes atomically under the lock.
pub type SharedStore = Arc<Mutex<ProgressionStore>>;
