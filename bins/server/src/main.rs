//! TranTrac web server.
//!
//! Main entry point: loads configuration, connects the database and the
//! spreadsheet, then serves the HTMX pages.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trantrac_api::{AppState, create_router};
use trantrac_core::import::ImportNormalizer;
use trantrac_core::sheets::GoogleSheetsClient;
use trantrac_db::connect_with;
use trantrac_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trantrac=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        session_expires_secs: i64::try_from(config.jwt.session_expiry_secs)
            .context("jwt.session_expiry_secs is too large")?,
    });

    let sheets = GoogleSheetsClient::new(config.sheets.clone())
        .context("Failed to set up the Google Sheets client")?;
    info!(spreadsheet_id = %config.sheets.spreadsheet_id, "Sheets client configured");

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        sheets: Arc::new(sheets),
        normalizer: Arc::new(ImportNormalizer::from_config(&config.import)),
        site: Arc::new(config.app.clone()),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
