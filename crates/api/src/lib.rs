//! HTTP layer of TranTrac.
//!
//! This crate provides:
//! - HTMX pages and partials rendered as HTML strings
//! - Cookie session middleware
//! - Handlers wiring the import normalizer, the repositories and the sheet client

pub mod error;
pub mod middleware;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::{Router, http::header};
use sea_orm::DatabaseConnection;
use tower_http::{sensitive_headers::SetSensitiveRequestHeadersLayer, trace::TraceLayer};
use trantrac_core::import::ImportNormalizer;
use trantrac_core::sheets::SheetClient;
use trantrac_shared::{JwtService, SiteConfig};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Session token service.
    pub jwt_service: Arc<JwtService>,
    /// Spreadsheet client, built once at startup.
    pub sheets: Arc<dyn SheetClient>,
    /// CSV import normalizer with the configured sender rules.
    pub normalizer: Arc<ImportNormalizer>,
    /// Site settings.
    pub site: Arc<SiteConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::app_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([header::COOKIE]))
        .with_state(state)
}
