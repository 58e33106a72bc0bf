// One-shot exporter: rebuilds the exported log from the exporter collection, then exits.

use anyhow::Result;
use loadcast::exporter::{ExportJob, run_export};
use loadcast::{config, logging, store};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let app_config = config::AppConfig::load()?;
    let job = ExportJob::from_config(&app_config)?;

    let store = store::MetricStore::connect(&app_config.store.path)
        .await
        .map_err(|e| anyhow::anyhow!("store {}: {:#}", app_config.store.path, e))?;
    store.init().await?;

    let summary = run_export(&store, &job).await?;
    tracing::info!(
        "Exported {} complete entries to {}",
        summary.records_written,
        job.output_path.display()
    );
    Ok(())
}
