use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_backend::{
    auth::{AuthGateway, PgCredentialStore},
    build_router,
    config::AppConfig,
    db, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_backend=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::parse();
    let auth_config = config
        .auth_config()
        .context("Invalid auth configuration")?;

    // Establish database connection pool
    let pool = db::establish_connection_pool(&config)?;
    if !config.skip_migrations {
        db::apply_migrations(&pool).await?;
    }

    let store = PgCredentialStore::new(pool.clone());
    let gateway = AuthGateway::new(&auth_config, Arc::new(store))
        .context("Failed to initialize auth gateway")?;

    let app = build_router(
        AppState::new(pool, gateway),
        config.cors_allowed_origins.as_deref(),
    );

    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
