use anyhow::Context;
use tracing::info;

use charter_quote::config::AppConfig;
use charter_quote::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let addr = config.bind_addr();
    info!(
        bareboat_discount_rate = %config.policy.bareboat_discount_rate,
        min_nights_with_dates = config.policy.min_nights_with_dates,
        "Pricing policy loaded"
    );

    let state = AppState::from_config(config).context("failed to load price table")?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Charter quote service listening on {}", addr);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
