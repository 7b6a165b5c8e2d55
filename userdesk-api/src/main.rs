//! # Userdesk API Server
//!
//! REST service for managing user accounts: listing, creation with a
//! generated password, profile updates, password changes and the
//! active/suspended/deactivated lifecycle.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/userdesk cargo run -p userdesk-api
//! ```

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use userdesk_shared::{
    db::{migrations, pool},
    repository::PgUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let json_logs = config.logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "userdesk_api=debug,userdesk_shared=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(
        "Userdesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db = pool::create_pool(
        &pool::PoolConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await?;

    if config.database.run_migrations {
        migrations::run_migrations(&db).await?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgUserRepository::new(db.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
