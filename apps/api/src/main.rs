mod analysis;
mod config;
mod documents;
mod errors;
mod extraction;
mod routes;
mod state;
mod taxonomy;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::taxonomy::Taxonomy;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (malformed env vars abort startup)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Fit API v{}", env!("CARGO_PKG_VERSION"));
    config.scoring_weights.warn_if_unnormalized();

    // Load skills catalog
    let taxonomy = match &config.skills_taxonomy_path {
        Some(path) => Taxonomy::from_json_file(path)?,
        None => Taxonomy::builtin()?,
    };
    info!(
        "Skills catalog loaded: {} skills in {} categories",
        taxonomy.len(),
        taxonomy.categories().len()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        taxonomy: Arc::new(taxonomy),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
