// Allow non-snake_case names for JSON field compatibility with the task API
#![allow(non_snake_case)]

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod models;
pub mod notify;
pub mod render;
pub mod server;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{HttpTaskStore, MemoryTaskStore, TaskStore};
use crate::app::LoadState;
use crate::error::Result;
use crate::models::{Settings, StoreKind};
use crate::server::Shell;

/// RUST_LOG wins over the configured filter
pub fn initLogging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.logFilter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn buildStore(settings: &Settings) -> Result<Arc<dyn TaskStore>> {
    Ok(match settings.store {
        StoreKind::Http => Arc::new(HttpTaskStore::new(&settings.apiBase)?),
        StoreKind::Memory => Arc::new(MemoryTaskStore::new()),
    })
}

/// Load settings, fetch the task list once, then serve the page until Ctrl-C
pub async fn run() -> Result<()> {
    let settings = config::loadSettings();
    initLogging(&settings);
    info!(apiBase = %settings.apiBase, store = ?settings.store, "Starting tasklist");

    let addr = settings.bindSocket()?;
    let shell = Arc::new(Shell::new(buildStore(&settings)?));

    if let LoadState::Unavailable(reason) = shell.app.initialise().await {
        error!(%reason, "Task store unreachable, starting with an empty list");
    }

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutting down");
                signal.cancel();
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    });

    server::serve(shell, addr, shutdown).await
}
