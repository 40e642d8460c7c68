mod config;
mod db;
mod errors;
mod extract;
mod extras;
mod locations;
mod models;
mod routes;
mod skills;
mod state;
mod users;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema, seed_catalog};
use crate::locations::search::CatalogPlaceSearch;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting profile board API v{} ({} profile)",
        env!("CARGO_PKG_VERSION"),
        config.environment.as_str()
    );

    let db = create_pool(&config.database).await?;
    if config.database.bootstrap_schema {
        ensure_schema(&db, config.database.backend).await?;
        seed_catalog(&db).await?;
    }

    let state = AppState {
        places: Arc::new(CatalogPlaceSearch::new(db.clone())),
        db,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
