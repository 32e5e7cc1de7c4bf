//! Blind-Spot Monitor - Main Entry Point

use monitor::{init_logging, run, MonitorConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Blind-Spot Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => MonitorConfig::load_from(&path)?,
        None => MonitorConfig::load()?,
    };

    run(config).await?;
    Ok(())
}
