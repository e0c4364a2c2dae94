//! Server configuration management

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};

/// Where template rows are stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StorageBackend {
    /// SQLite database at the given connection string
    Sqlite(String),
    /// Process memory; contents are lost on restart
    Memory,
}

impl StorageBackend {
    fn parse(database_url: &str) -> Result<Self> {
        let url = database_url.trim();
        if url.eq_ignore_ascii_case("memory") {
            Ok(Self::Memory)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite(url.to_string()))
        } else {
            Err(ApiError::Config(format!(
                "Unsupported DATABASE_URL {:?}: expected sqlite:<path> or memory",
                url
            )))
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    pub storage: StorageBackend,

    /// `key:Name` pairs of the sites served
    pub sites: Vec<(String, String)>,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,

    /// Whether to enable debug logging
    pub debug: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            storage: StorageBackend::parse(
                &std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:./data/fhsk.db".to_string()),
            )?,
            sites: parse_sites(
                &std::env::var("SITES").unwrap_or_else(|_| "fhsk:FhSiteKit".to_string()),
            )?,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            debug: std::env::var("DEBUG")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        })
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "fhsk_server=debug,ndg_template=debug,fhsk_core=debug,tower_http=debug"
        } else {
            "fhsk_server=info,ndg_template=info,tower_http=info"
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            storage: StorageBackend::Memory,
            sites: vec![("fhsk".to_string(), "FhSiteKit".to_string())],
            cors_origins: vec!["*".to_string()],
            debug: false,
        }
    }
}

/// Parse `key:Name,key2:Name2`; a bare key is its own name
pub fn parse_sites(value: &str) -> Result<Vec<(String, String)>> {
    let sites = value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, name) = entry.split_once(':').unwrap_or((entry, entry));
            let (key, name) = (key.trim(), name.trim());
            if key.is_empty() || key.contains('/') {
                return Err(ApiError::Config(format!("Invalid site key in SITES: {:?}", entry)));
            }
            Ok((key.to_string(), name.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    if sites.is_empty() {
        return Err(ApiError::Config("SITES must name at least one site".to_string()));
    }

    Ok(sites)
}
