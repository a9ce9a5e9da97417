mod config;
mod context;
mod errors;
mod layout;
mod models;
mod resume;
mod routes;
mod state;
mod sync;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::context::InMemoryContextStore;
use crate::layout::{page_layout, ResolvedStyles};
use crate::resume::template::verify_template;
use crate::routes::build_router;
use crate::state::AppState;
use crate::sync::SessionRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-sync v{}", env!("CARGO_PKG_VERSION"));

    // A broken template is a programming error; refuse to start.
    verify_template()?;

    let default_layout = page_layout(&ResolvedStyles::default());
    info!(
        "Default page layout: {:?} {}pt, {} lines per page",
        default_layout.fit_mode, default_layout.font_size_pt, default_layout.usable_height_lines
    );
    info!(
        "Completion indicator {}",
        if config.completion_indicator_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let state = AppState {
        config: config.clone(),
        sessions: Arc::new(SessionRegistry::new()),
        context_store: Arc::new(InMemoryContextStore::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the editor host once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
