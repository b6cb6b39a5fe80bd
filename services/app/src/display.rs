//! services/app/src/display.rs
//!
//! Terminal rendering for the progression views. Free formatting functions,
//! plain println output, colors via owo-colors.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use plastivize_core::{
    catalog::{ALL_ACHIEVEMENTS, MARKETPLACE_ITEMS},
    domain::{PlasticClassification, ReuseIdea, UserData},
};

/// Relative age label for activity entries, matching the web app's buckets.
/// Months are day-count / 30 but years are day-count / 365.
pub fn format_time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days}d ago");
    }
    let months = days / 30;
    if months < 12 {
        return format!("{months}mo ago");
    }
    let years = days / 365;
    format!("{years}y ago")
}

/// Display an error
pub fn display_error(message: &str) {
    eprintln!("[ERROR] {}", message.red());
}

/// Display a success message
pub fn display_success(message: &str) {
    println!("[OK] {}", message.green());
}

/// Display an info message
pub fn display_info(message: &str) {
    println!("[INFO] {}", message);
}

/// Display a warning
pub fn display_warning(message: &str) {
    println!("[WARNING] {}", message.yellow());
}

/// Display the impact summary card.
pub fn display_stats(data: &UserData) {
    println!();
    if let Some(username) = &data.username {
        println!("Your Impact, {}", username.bold());
    } else {
        println!("Your Impact");
    }
    println!(
        "  Items Scanned  {}",
        data.stats.items_scanned.to_string().bold()
    );
    println!(
        "  CO2 Saved      {}",
        format!("{:.2} kg", data.stats.co2_saved).bold()
    );
    println!(
        "  Eco-Points     {}",
        data.stats.eco_points.to_string().bright_yellow().bold()
    );
    println!();
}

/// Display the achievement badge list with locked/unlocked markers.
pub fn display_achievements(data: &UserData) {
    println!();
    println!("Achievements");
    for achievement in ALL_ACHIEVEMENTS {
        let unlocked = data
            .unlocked_achievements
            .iter()
            .any(|id| id == achievement.id);
        if unlocked {
            println!(
                "  {} {}  {}",
                achievement.icon,
                achievement.name.green().bold(),
                achievement.description.dimmed()
            );
        } else {
            println!(
                "  {} {}  {}",
                achievement.icon,
                achievement.name.dimmed(),
                "Locked".dimmed()
            );
        }
    }
    println!();
}

/// Display the five most recent scans, newest first.
pub fn display_history(data: &UserData) {
    println!();
    println!("Recent Scans");
    if data.scan_history.is_empty() {
        println!("  {}", "Your scan history will appear here.".dimmed());
        println!();
        return;
    }
    for scan in data.scan_history.iter().rev().take(5) {
        println!(
            "  {}  {}  {}  {}",
            scan.date.format("%Y-%m-%d"),
            scan.plastic_type.bold(),
            format!("+{} pts", scan.eco_points).green(),
            format!("-{:.2}kg CO2", scan.co2_saved).dimmed()
        );
    }
    println!();
}

/// Display the activity feed with relative timestamps.
pub fn display_activity(data: &UserData) {
    println!();
    println!("Recent Activity");
    if data.activity_log.is_empty() {
        println!("  {}", "Your recent activities will appear here.".dimmed());
        println!("  {}", "Scan an item to get started!".dimmed());
        println!();
        return;
    }
    let now = Utc::now();
    for entry in &data.activity_log {
        println!(
            "  {}  {} {}",
            format!("{:>11}", format_time_ago(entry.date, now)).dimmed(),
            entry.title.bold(),
            entry.description
        );
    }
    println!();
}

/// Display the marketplace with per-item unlock status.
pub fn display_market(data: &UserData) {
    println!();
    println!("{}", "Discover Products from Waste".bold());
    println!("Unlock these unique items created by the community using your Eco-Points.");
    println!(
        "Balance: {}",
        format!("{} pts", data.stats.eco_points).bright_yellow().bold()
    );
    println!();
    for item in MARKETPLACE_ITEMS {
        let owned = data
            .unlocked_marketplace_items
            .iter()
            .any(|id| id == item.id);
        let status = if owned {
            "Unlocked".green().to_string()
        } else {
            format!("Unlock for {}", item.cost).yellow().to_string()
        };
        println!("  {}  {}  [{}]", item.id.dimmed(), item.title.bold(), status);
        println!("      by {}  {}", item.creator, item.description.dimmed());
    }
    println!();
}

/// Display one classification result and the points it earned.
pub fn display_classification(classification: &PlasticClassification, points_earned: u32) {
    println!();
    println!(
        "Identified: {}  (confidence {:.0}%)",
        classification.plastic_type.bold(),
        classification.confidence_score * 100.0
    );
    println!("  Recyclability       {}", classification.recyclability);
    println!("  Decomposition time  {}", classification.decomposition_time);
    println!("  Carbon impact       {}", classification.carbon_impact);
    println!(
        "{}",
        format!("+{} eco-points earned", points_earned).green().bold()
    );
    println!();
}

/// Display the reuse-idea suggestions for a scanned item.
pub fn display_reuse_ideas(ideas: &[ReuseIdea]) {
    if ideas.is_empty() {
        return;
    }
    println!("Reuse ideas:");
    for idea in ideas {
        println!("  * {}  {}", idea.title.bold(), idea.description);
    }
    println!();
}
