//! crates/plastivize_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! The persisted aggregate keeps the camelCase field names of the stored
//! JSON record, so a document written by any previous build reads back as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative per-user counters. Only `eco_points` ever decreases, and only
/// through a successful marketplace spend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub items_scanned: u32,
    pub co2_saved: f64, // kilograms
    pub eco_points: u32,
}

/// One recorded scan. Immutable once created; the history list only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryItem {
    pub date: DateTime<Utc>,
    pub plastic_type: String,
    pub co2_saved: f64,
    pub eco_points: u32,
}

/// Category of an activity-feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Scan,
    Achievement,
    Marketplace,
}

/// A human-readable entry in the newest-first activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogItem {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub date: DateTime<Utc>,
    pub title: String,
    pub description: String,
}

/// The root aggregate: everything the app knows about the current user.
/// `username` doubles as the logged-in signal - when it is `None` the rest
/// of the aggregate is the anonymous initial state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub stats: UserStats,
    pub unlocked_achievements: Vec<String>,
    pub username: Option<String>,
    pub scan_history: Vec<ScanHistoryItem>,
    pub unlocked_marketplace_items: Vec<String>,
    pub activity_log: Vec<ActivityLogItem>,
}

impl UserData {
    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }
}

/// What the AI collaborator reports about a scanned item. The engine only
/// reads `plastic_type`; the remaining fields are display material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlasticClassification {
    pub plastic_type: String,
    pub recyclability: String,
    pub decomposition_time: String,
    pub carbon_impact: String,
    pub confidence_score: f64,
}

/// A creative-reuse suggestion for a plastic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReuseIdea {
    pub title: String,
    pub description: String,
}

// The identity descriptor handed over by the identity provider on sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub email: Option<String>, // providers may omit it; display falls back to a placeholder
}
