use fhsk_server::{AppState, config::ServerConfig, create_router, error::Result, template_table};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.default_log_filter().to_string()),
        )
        .init();

    info!(
        "Starting FhSiteKit server on {}:{} for {} site(s)",
        config.host,
        config.port,
        config.sites.len()
    );

    let templates = template_table(&config).await?;
    let state = AppState::new(config.clone(), Arc::new(templates));
    let app = create_router(state)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| fhsk_server::error::ApiError::Config("Invalid HOST value".to_string()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
