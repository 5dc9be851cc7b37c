// ==========================================
// spooltrack - server entry point
// ==========================================

use std::sync::Arc;

use spooltrack::app::AppState;
use spooltrack::config::ServerConfig;
use spooltrack::{http, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("spooltrack - filament inventory service");
    tracing::info!("version: {}", spooltrack::VERSION);
    tracing::info!("==================================================");

    let config = ServerConfig::from_env();
    tracing::info!(db = %config.db_path, addr = %config.listen_addr, "starting");

    let state = Arc::new(AppState::new(&config.db_path)?);

    http::serve(state, &config.listen_addr).await?;

    tracing::info!("server stopped");
    Ok(())
}
