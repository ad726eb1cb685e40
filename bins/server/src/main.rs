//! lexbill API server
//!
//! Serves invoice summaries computed from the practice-management backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexbill_api::{AppState, create_router};
use lexbill_client::BackendClient;
use lexbill_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexbill=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let client = BackendClient::new(&config.backend).context("Failed to build backend client")?;
    info!(
        base_url = %client.base_url(),
        timeout_secs = config.backend.timeout_secs,
        authenticated = config.backend.api_token.is_some(),
        "Backend client configured"
    );
    info!(
        expense_currency = %config.billing.expense_currency,
        "Billing rules loaded"
    );

    let state = AppState::new(Arc::new(client), &config.billing);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
