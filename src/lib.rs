//! Quote engine and JSON API for the yacht charter wizard.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod pricing;
pub mod wizard;

use config::AppConfig;
use error::ConfigError;
use pricing::leads::{LeadSink, LogLeadSink};
use pricing::PriceTable;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub prices: Arc<PriceTable>,
    pub leads: Arc<dyn LeadSink>,
}

impl AppState {
    pub fn new(config: AppConfig, prices: PriceTable, leads: Arc<dyn LeadSink>) -> Self {
        Self {
            config: Arc::new(config),
            prices: Arc::new(prices),
            leads,
        }
    }

    /// State for a configuration, loading the price table it points to
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let prices = match &config.price_table_path {
            Some(path) => {
                tracing::info!("Loading price table from {}", path.display());
                PriceTable::load(path)?
            }
            None => PriceTable::standard().clone(),
        };
        Ok(Self::new(config, prices, Arc::new(LogLeadSink)))
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
