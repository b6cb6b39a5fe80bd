pub mod catalog;
pub mod domain;
pub mod persistence;
pub mod ports;
pub mod session;
pub mod store;

pub use catalog::{Achievement, MarketplaceItemData, ALL_ACHIEVEMENTS, MARKETPLACE_ITEMS};
pub use domain::{ActivityKind, ActivityLogItem, Identity, PlasticClassification, ReuseIdea,
    ScanHistoryItem, UserData, UserStats};
pub use persistence::{PersistenceAdapter, STORAGE_KEY};
pub use ports::{ClassificationService, IdentityService, PortError, PortResult, ReuseIdeaService,
    SessionEvent, SessionStream, StateStorage};
pub use session::SessionBinder;
pub use store::ProgressionStore;
