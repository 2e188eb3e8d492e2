use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;
use sea_orm::Database;

use crate::schemas::AppState;

/// Process configuration resolved once at startup and passed explicitly to
/// the state constructor; no ambient globals after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
}

impl AppConfig {
    /// Gather configuration from the environment (with `.env` support).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://shiprust.db".to_string()),
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:5100".to_string()),
        }
    }
}

/// Connect to the database and build the shared application state.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    // Postal-zone reference data changes rarely; an hour of TTL is plenty.
    let zone_cache = Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(3600))
        .build();

    Ok(AppState { db, zone_cache })
}
