//! services/app/src/bin/plastivize.rs

use app_lib::{
    adapters::{
        classifier_llm::OpenAiClassifierAdapter, identity::LocalIdentityAdapter,
        ideas_llm::OpenAiReuseIdeasAdapter, storage::FileStorageAdapter,
    },
    cli, commands,
    config::Config,
    display,
    error::AppError,
    session::session_binder_process,
    state::{AppState, SharedStore},
};
use async_openai::{config::OpenAIConfig, Client};
use owo_colors::OwoColorize;
use plastivize_core::{
    persistence::PersistenceAdapter,
    ports::{ClassificationService, IdentityService, ReuseIdeaService},
    session::SessionBinder,
    store::ProgressionStore,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting Plastivize...");

    // --- 2. Open Local Storage & Restore the Aggregate ---
    let storage = Arc::new(FileStorageAdapter::new(&config.data_dir)?);
    let persistence = Arc::new(PersistenceAdapter::new(storage));
    let store: SharedStore = Arc::new(Mutex::new(ProgressionStore::initialize(
        persistence.load().await,
    )));

    // --- 3. Initialize the Identity Provider ---
    // A failed provider disables auth but never kills the program.
    let auth = match LocalIdentityAdapter::new(&config.data_dir) {
        Ok(adapter) => Some(Arc::new(adapter)),
        Err(e) => {
            warn!("Identity provider unavailable, authentication is disabled: {e}");
            None
        }
    };
    let identity: Option<Arc<dyn IdentityService>> =
        auth.clone().map(|a| a as Arc<dyn IdentityService>);

    // --- 4. Initialize the AI Adapters (optional) ---
    let mut classifier: Option<Arc<dyn ClassificationService>> = None;
    let mut ideas: Option<Arc<dyn ReuseIdeaService>> = None;
    if let Some(api_key) = &config.openai_api_key {
        let openai_config = OpenAIConfig::new().with_api_key(api_key);
        let openai_client = Client::with_config(openai_config);
        classifier = Some(Arc::new(OpenAiClassifierAdapter::new(
            openai_client.clone(),
            config.classifier_model.clone(),
        )));
        ideas = Some(Arc::new(OpenAiReuseIdeasAdapter::new(
            openai_client,
            config.ideas_model.clone(),
        )));
    } else {
        info!("No OPENAI_API_KEY configured; scanning is disabled.");
    }

    // --- 5. Build the Shared AppState ---
    let app_state = AppState {
        config: config.clone(),
        persistence: persistence.clone(),
        identity: identity.clone(),
        auth,
        classifier,
        ideas,
    };

    // --- 6. Start the Session Binder ---
    let cancellation_token = CancellationToken::new();
    let binder_task = identity.map(|identity| {
        tokio::spawn(session_binder_process(
            identity,
            SessionBinder::new(persistence),
            store.clone(),
            cancellation_token.clone(),
        ))
    });

    // --- 7. Run the Interactive Loop ---
    println!();
    println!("{}", "Plastivize".green().bold());
    println!("Scan plastic, track your impact, spend your eco-points.");
    println!("Type `help` for commands, `exit` to leave.");
    if app_state.auth.is_none() {
        display::display_warning("Running without authentication; progress will not be saved.");
    }
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "plastivize>".green());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // end of input
        };
        if line.trim().is_empty() {
            continue;
        }
        match cli::parse_line(&line) {
            Ok(cli::Command::Exit) => break,
            Ok(command) => {
                if let Err(e) = commands::handle(&app_state, &store, command).await {
                    display::display_error(&e.to_string());
                }
            }
            Err(rendered) => println!("{rendered}"),
        }
    }

    // --- 8. Shut Down ---
    cancellation_token.cancel();
    if let Some(task) = binder_task {
        let _ = task.await;
    }
    info!("Goodbye.");
    Ok(())
}
