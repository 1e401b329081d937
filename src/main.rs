//! Gaming Realm API server binary

use anyhow::Result;
use gaming_realm::config::AppConfig;
use gaming_realm::server::{AppState, build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gaming_realm=debug,tower_http=debug")),
        )
        .init();

    let config = match std::env::var("GAMING_REALM_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default(),
    };
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::in_memory(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
