//! Coastal Threat Pipeline - Main Entry Point

use pipeline::{init_logging, run, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Coastal Threat Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    let report = run(&settings).await?;

    info!(
        locations = report.locations_exported,
        alerts = report.alerts_emitted,
        degraded = report.fusion.unavailable_predictions,
        "fusion-then-alert run finished"
    );
    Ok(())
}
