//! services/app/src/commands.rs
//!
//! Executes one parsed command against the shared state. Every handler
//! returns `Ok(())` for expected outcomes (including rejections, which are
//! printed, not raised); `Err` is reserved for real application failures.

use std::path::Path;

use plastivize_core::catalog::{find_achievement, find_marketplace_item};
use tracing::warn;

use crate::cli::Command;
use crate::display;
use crate::error::AppError;
use crate::state::{AppState, SharedStore};

/// Maps an image file extension to the MIME type sent to the classifier.
fn mime_for_image(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Dispatches one parsed command. `Exit` never reaches this function; the
/// input loop consumes it.
pub async fn handle(state: &AppState, store: &SharedStore, command: Command) -> Result<(), AppError> {
    match command {
        Command::Signup { email, password } => signup(state, &email, &password).await,
        Command::Login { email, password } => login(state, &email, &password).await,
        Command::Logout => logout(state, store).await,
        Command::Scan { image } => scan(state, store, &image).await,
        Command::Stats => {
            if require_session(store).await {
                display::display_stats(store.lock().await.data());
            }
            Ok(())
        }
        Command::History => {
            if require_session(store).await {
                display::display_history(store.lock().await.data());
            }
            Ok(())
        }
        Command::Activity => {
            if require_session(store).await {
                display::display_activity(store.lock().await.data());
            }
            Ok(())
        }
        Command::Achievements => {
            if require_session(store).await {
                display::display_achievements(store.lock().await.data());
            }
            Ok(())
        }
        Command::Market => {
            if require_session(store).await {
                display::display_market(store.lock().await.data());
            }
            Ok(())
        }
        Command::Unlock { item_id } => unlock(state, store, &item_id).await,
        Command::Rename { username } => rename(state, store, &username.join(" ")).await,
        Command::Exit => Ok(()),
    }
}

/// Progression views and mutations are only reachable with a session, the
/// same gate the web app's navigation applies.
async fn require_session(store: &SharedStore) -> bool {
    if store.lock().await.is_logged_in() {
        return true;
    }
    display::display_info("You need an account for that. Try `signup <email> <password>` or `login <email> <password>`.");
    false
}

async fn signup(state: &AppState, email: &str, password: &str) -> Result<(), AppError> {
    let Some(auth) = &state.auth else {
        display::display_warning("Authentication is unavailable in this session.");
        return Ok(());
    };
    match auth.sign_up(email, password).await {
        Ok(identity) => {
            let who = identity.email.as_deref().unwrap_or_default().to_string();
            display::display_success(&format!("Account created. Signed in as {who}."));
        }
        Err(e) => display::display_error(&e.to_string()),
    }
    Ok(())
}

async fn login(state: &AppState, email: &str, password: &str) -> Result<(), AppError> {
    let Some(auth) = &state.auth else {
        display::display_warning("Authentication is unavailable in this session.");
        return Ok(());
    };
    match auth.sign_in(email, password).await {
        Ok(identity) => {
            let who = identity.email.as_deref().unwrap_or_default().to_string();
            display::display_success(&format!("Welcome back, {who}."));
        }
        Err(e) => display::display_error(&e.to_string()),
    }
    Ok(())
}

/// Signs out at the provider when one is available, then resets local
/// progress regardless of the provider outcome.
async fn logout(state: &AppState, store: &SharedStore) -> Result<(), AppError> {
    if let Some(identity) = &state.identity {
        if let Err(e) = identity.sign_out().await {
            warn!("Provider sign-out failed, clearing local session anyway: {e}");
        }
    }
    let mut guard = store.lock().await;
    guard.reset();
    state.persistence.sync(guard.data()).await;
    display::display_success("Signed out.");
    Ok(())
}

async fn scan(state: &AppState, store: &SharedStore, image: &Path) -> Result<(), AppError> {
    if !require_session(store).await {
        return Ok(());
    }
    let Some(classifier) = &state.classifier else {
        display::display_warning(
            "Classification is unavailable: no OPENAI_API_KEY configured. Nothing was recorded.",
        );
        return Ok(());
    };
    let Some(mime_type) = mime_for_image(image) else {
        display::display_error("Unsupported image type. Use a .jpg, .png or .webp file.");
        return Ok(());
    };

    let image_data = tokio::fs::read(image).await?;

    // 1. Classify first; a failed classification records nothing.
    let classification = match classifier.classify_item(&image_data, mime_type).await {
        Ok(c) => c,
        Err(e) => {
            warn!("Classification failed: {e}");
            display::display_error("Could not identify the plastic. Try a clearer image.");
            return Ok(());
        }
    };

    // 2. Record the scan and persist the new aggregate under one lock.
    let (points_earned, newly_unlocked) = {
        let mut guard = store.lock().await;
        let before = guard.data().unlocked_achievements.len();
        let points = guard.add_scan_result(&classification);
        let newly = guard.data().unlocked_achievements[before..].to_vec();
        state.persistence.sync(guard.data()).await;
        (points, newly)
    };

    display::display_classification(&classification, points_earned);
    for id in &newly_unlocked {
        if let Some(achievement) = find_achievement(id) {
            display::display_success(&format!(
                "Achievement unlocked: {} {}",
                achievement.icon, achievement.name
            ));
        }
    }

    // 3. Ideas are decoration; failures are logged and the scan stands.
    if let Some(ideas_service) = &state.ideas {
        match ideas_service
            .suggest_reuse_ideas(&classification.plastic_type)
            .await
        {
            Ok(ideas) => display::display_reuse_ideas(&ideas),
            Err(e) => warn!("Reuse-idea suggestion failed: {e}"),
        }
    }
    Ok(())
}

async fn unlock(state: &AppState, store: &SharedStore, item_id: &str) -> Result<(), AppError> {
    if !require_session(store).await {
        return Ok(());
    }
    let Some(item) = find_marketplace_item(item_id) else {
        display::display_error("No such marketplace item. Use `market` to list the item ids.");
        return Ok(());
    };

    let mut guard = store.lock().await;
    if guard.spend_eco_points(item.id, item.cost) {
        state.persistence.sync(guard.data()).await;
        display::display_success(&format!("Item Unlocked! You've unlocked \"{}\".", item.title));
    } else if guard.data().unlocked_marketplace_items.iter().any(|id| id == item.id) {
        display::display_info(&format!("You already own \"{}\".", item.title));
    } else {
        display::display_error("Not Enough Points. Scan more items to earn Eco-Points.");
    }
    Ok(())
}

async fn rename(state: &AppState, store: &SharedStore, username: &str) -> Result<(), AppError> {
    if !require_session(store).await {
        return Ok(());
    }
    let mut guard = store.lock().await;
    if guard.update_username(username) {
        state.persistence.sync(guard.data()).await;
        display::display_success(&format!("Name updated to {}.", guard.data().username.as_deref().unwrap_or_default()));
    } else {
        display::display_error("A name cannot be empty.");
    }
    Ok(())
}
