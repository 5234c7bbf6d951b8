//! # Teamspace API Server
//!
//! HTTP server for the Teamspace project-management backend: account
//! registration, login, provider callback and logout, plus the
//! authenticated user surface.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p teamspace-api
//! ```

use teamspace_api::app::{build_router, AppState};
use teamspace_api::config::Config;
use teamspace_shared::db::{migrations, pool};
use teamspace_shared::session::SessionStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamspace_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Teamspace API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let sessions =
        SessionStore::connect(&config.session.redis_url, config.session.ttl_seconds).await?;

    let bind_address = config.bind_address();
    let environment = config.api.environment.clone();
    let state = AppState::new(db, sessions, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{} in {}", bind_address, environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
