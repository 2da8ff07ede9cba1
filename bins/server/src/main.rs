//! Adbudget API Server
//!
//! Main entry point for the budget/result reconciliation service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adbudget_api::{AppState, HttpLimits, create_router};
use adbudget_db::{PoolOptions, connect_with};
use adbudget_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adbudget=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let pool = PoolOptions {
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
    };
    let db = connect_with(&config.database.url, pool).await?;
    info!(max_connections = pool.max_connections, "Connected to database");

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    };

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(jwt_config)),
        granularity: config.reconciliation.granularity,
    };
    info!(granularity = ?state.granularity, "Reconciliation key granularity");

    let app = create_router(state, HttpLimits::from(&config.server));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
