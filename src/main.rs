use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use docindex_backend::config;
use docindex_backend::service::{Backends, DocumentService};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging / 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docindex_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);
    tracing::info!(
        "Solr core {} at {} (suggester {})",
        app_config.solr.core,
        app_config.solr.base(),
        app_config.solr.suggester
    );

    let upload_dir = app_config.get_upload_dir();
    if !upload_dir.exists() {
        std::fs::create_dir_all(&upload_dir)?;
        tracing::info!("Created upload directory: {:?}", upload_dir);
    }

    let backends = Backends::solr(&app_config)?;
    let service = DocumentService::new(&app_config, backends);
    let state = Arc::new(AppState::new(service));

    let app = api::router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
