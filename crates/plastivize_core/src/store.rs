//! crates/plastivize_core/src/store.rs
//!
//! The progression store: single authoritative owner of the `UserData`
//! aggregate. Every mutation runs to completion inside one `&mut self`
//! method, so observers never see intermediate state. The store performs
//! no I/O; persistence and session wiring live next door.

use chrono::Utc;

use crate::catalog::{find_marketplace_item, ALL_ACHIEVEMENTS};
use crate::domain::{ActivityKind, ActivityLogItem, PlasticClassification, ScanHistoryItem, UserData};

/// Flat reward per recorded scan, independent of plastic type or confidence.
pub const POINTS_PER_SCAN: u32 = 10;
/// Flat CO₂ credit per recorded scan, in kilograms.
pub const CO2_SAVED_PER_SCAN_KG: f64 = 0.6;
/// The activity feed keeps only this many of the most recent entries.
pub const ACTIVITY_LOG_CAP: usize = 20;

/// Reduces an AI-reported plastic label to its short form: the first
/// whitespace-delimited token with any literal `(` stripped, so
/// `"PET (Polyethylene terephthalate)"` becomes `"PET"`. Empty input stays
/// empty; the store records whatever comes back.
pub fn normalize_plastic_type(raw: &str) -> String {
    raw.split_whitespace().next().unwrap_or("").replace('(', "")
}

/// Owns the aggregate and applies every state transition.
#[derive(Debug, Clone, Default)]
pub struct ProgressionStore {
    data: UserData,
}

impl ProgressionStore {
    /// Startup entry point. A persisted aggregate is adopted only when it
    /// belongs to a signed-in session; anything else falls back to the
    /// anonymous initial aggregate.
    pub fn initialize(persisted: Option<UserData>) -> Self {
        match persisted {
            Some(data) if data.is_logged_in() => Self { data },
            _ => Self::default(),
        }
    }

    pub fn data(&self) -> &UserData {
        &self.data
    }

    pub fn is_logged_in(&self) -> bool {
        self.data.is_logged_in()
    }

    /// Records one classified scan: updates stats, appends history, prepends
    /// activity entries, and unlocks any achievement whose threshold the new
    /// scan count reaches. Returns the points earned so the caller can show
    /// them. Never fails; an empty plastic label is recorded as-is.
    pub fn add_scan_result(&mut self, classification: &PlasticClassification) -> u32 {
        let points_earned = POINTS_PER_SCAN;
        let co2_saved_per_item = CO2_SAVED_PER_SCAN_KG;
        let plastic_type = normalize_plastic_type(&classification.plastic_type);

        let new_scan = ScanHistoryItem {
            date: Utc::now(),
            plastic_type: plastic_type.clone(),
            co2_saved: co2_saved_per_item,
            eco_points: points_earned,
        };

        self.data.stats.items_scanned += 1;
        self.data.stats.eco_points += points_earned;
        self.data.stats.co2_saved += co2_saved_per_item;

        self.data.activity_log.insert(
            0,
            ActivityLogItem {
                kind: ActivityKind::Scan,
                date: new_scan.date,
                title: format!("Scanned a {} item", new_scan.plastic_type),
                description: format!(
                    "+{} Eco-Points, +{:.2}kg CO₂ saved",
                    points_earned, co2_saved_per_item
                ),
            },
        );
        self.data.scan_history.push(new_scan);

        // Threshold pass over the catalog; ids already unlocked never re-fire.
        // Each fresh unlock lands in front of the scan entry it came from.
        let newly_unlocked: Vec<_> = ALL_ACHIEVEMENTS
            .iter()
            .filter(|ach| {
                self.data.stats.items_scanned >= ach.threshold
                    && !self.data.unlocked_achievements.iter().any(|id| id == ach.id)
            })
            .collect();

        for ach in &newly_unlocked {
            self.data.activity_log.insert(
                0,
                ActivityLogItem {
                    kind: ActivityKind::Achievement,
                    date: Utc::now(),
                    title: "Achievement Unlocked!".to_string(),
                    description: format!("You earned the \"{}\" badge.", ach.name),
                },
            );
        }
        self.data
            .unlocked_achievements
            .extend(newly_unlocked.iter().map(|ach| ach.id.to_string()));

        self.data.activity_log.truncate(ACTIVITY_LOG_CAP);
        points_earned
    }

    /// Spends eco-points on a marketplace item. Rejected (returning `false`,
    /// with zero mutation) when the id is unknown, the item is already
    /// unlocked, or the balance is short of `cost`.
    pub fn spend_eco_points(&mut self, item_id: &str, cost: u32) -> bool {
        let Some(item) = find_marketplace_item(item_id) else {
            return false;
        };
        // Unlocks model permanent ownership; a repeat purchase would only
        // burn points, so it is refused rather than re-charged.
        if self.data.unlocked_marketplace_items.iter().any(|id| id == item_id) {
            return false;
        }
        if self.data.stats.eco_points < cost {
            return false;
        }

        self.data.stats.eco_points -= cost;
        self.data.unlocked_marketplace_items.push(item_id.to_string());
        self.data.activity_log.insert(
            0,
            ActivityLogItem {
                kind: ActivityKind::Marketplace,
                date: Utc::now(),
                title: "Marketplace Unlock".to_string(),
                description: format!("You unlocked \"{}\" for {} points.", item.title, cost),
            },
        );
        self.data.activity_log.truncate(ACTIVITY_LOG_CAP);
        true
    }

    /// Replaces the username with the trimmed input. Whitespace-only input is
    /// a no-op returning `false`. Stats, history, and unlocks are untouched.
    pub fn update_username(&mut self, new_username: &str) -> bool {
        let trimmed = new_username.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.data.username = Some(trimmed.to_string());
        true
    }

    /// Adopts a live identity's display name, keeping every other field of
    /// whatever aggregate is currently held. This is how stats survive a
    /// session restore.
    pub fn begin_session(&mut self, display_name: &str) {
        self.data.username = Some(display_name.to_string());
    }

    /// Restores the anonymous initial aggregate.
    pub fn reset(&mut self) {
        self.data = UserData::default();
    }
}
