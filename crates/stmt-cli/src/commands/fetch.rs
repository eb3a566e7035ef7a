use anyhow::{Result, anyhow};
use std::sync::Arc;
use stmt_client::AlphaVantageClient;
use stmt_loaders::{FetchRunReport, LoaderContext, QuotaScheduler};
use tracing::info;

use crate::config::Settings;

/// Fetch the next batch of symbols and update the progress record
pub async fn execute(settings: &Settings) -> Result<FetchRunReport> {
  let scheduler_config = settings.scheduler_config()?;

  let api_config = stmt_core::Config::from_env()?;
  info!("Using {} with {} requests/minute", api_config.base_url, api_config.rate_limit);

  let client = Arc::new(
    AlphaVantageClient::new(api_config).map_err(|e| anyhow!("Failed to create API client: {}", e))?,
  );
  let context = LoaderContext::new(client, settings.layout(), settings.loader_config());

  let report = QuotaScheduler::new(scheduler_config).run(&context).await?;

  if report.reset {
    println!("Every symbol had been fetched, started a new cycle");
  }
  println!(
    "Fetched {} symbols ({} files saved, {} requests failed). Remaining: {}",
    report.processed, report.saved, report.failed, report.remaining
  );
  info!("Run took {}s", (report.finished_at - report.started_at).num_seconds());

  Ok(report)
}
