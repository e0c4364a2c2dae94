//! FhSiteKit HTTP API server
//!
//! Serves the template admin routes of every configured site.

use axum::{
    Router,
    http::HeaderValue,
    response::Json,
    routing::get,
};
use fhsk_core::{MemoryTableGateway, SqliteTableGateway};
use ndg_template::{TemplateRepository, TemplateTable, template_queries};
use serde_json::{Value, json};
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod site;

use config::{ServerConfig, StorageBackend};
use error::{ApiError, Result};
use site::SiteRegistry;

/// Table holding the templates
pub const TEMPLATE_TABLE: &str = "template";

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<dyn TemplateRepository>,
    pub sites: Arc<SiteRegistry>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig, templates: Arc<dyn TemplateRepository>) -> Self {
        Self {
            templates,
            sites: Arc::new(SiteRegistry::new(&config.sites)),
            config,
        }
    }
}

/// Build the template repository for the configured storage backend
pub async fn template_table(config: &ServerConfig) -> Result<TemplateTable> {
    match &config.storage {
        StorageBackend::Sqlite(database_url) => {
            let gateway = SqliteTableGateway::new(database_url, TEMPLATE_TABLE).await?;
            let table = TemplateTable::new(Arc::new(gateway))
                .with_query_library(Arc::new(template_queries()));
            table.ensure_schema().await?;
            info!("Using SQLite template storage at {}", database_url);
            Ok(table)
        }
        StorageBackend::Memory => {
            info!("Using in-memory template storage");
            Ok(TemplateTable::new(Arc::new(MemoryTableGateway::new(
                TEMPLATE_TABLE,
            ))))
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors_origins)?;

    Ok(Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(routes::template_admin::router())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| ApiError::Config(format!("Invalid CORS origin {:?}", o)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new().allow_origin(AllowOrigin::list(origins)))
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Config(e.to_string()))?;

    Ok(Json(json!({
        "status": "healthy",
        "service": "fhsk-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp
    })))
}
