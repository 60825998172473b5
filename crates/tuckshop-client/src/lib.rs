pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod events;
pub mod session;
pub mod state;
pub mod views;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tuckshop_shared::credentials::ServiceAccountKey;
use tuckshop_store::Database;

use crate::config::ShopConfig;
use crate::state::AppState;

pub async fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("tuckshop_client=info,tuckshop_store=info,warn")
    });

    // stdout belongs to the console.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tuck shop admin v{}", env!("CARGO_PKG_VERSION"));

    let config = ShopConfig::from_env();
    info!(?config, "Loaded configuration");

    let key = ServiceAccountKey::load(&config.credentials_path).with_context(|| {
        format!(
            "cannot initialise the document store from {}",
            config.credentials_path.display()
        )
    })?;
    info!(project = %key.project_id, "Loaded service account");

    let database = match &config.database_path {
        Some(path) => Database::open_at(path),
        None => Database::new(&key),
    }
    .context("cannot open the document store")?;
    if let Some(path) = database.path() {
        info!(path = %path.display(), "Document store ready");
    }

    let (ui_tx, ui_rx) = events::channel();
    let state = AppState::new(Arc::new(config), database, ui_tx);

    console::run_console(state, ui_rx).await
}
