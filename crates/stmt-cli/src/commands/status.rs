use anyhow::Result;
use stmt_loaders::QuotaScheduler;

use crate::config::Settings;

/// Show progress through the universe and the next batch. Makes no API call.
pub async fn execute(settings: &Settings) -> Result<()> {
  let config = settings.scheduler_config()?;
  let layout = settings.layout();
  let scheduler = QuotaScheduler::new(config);

  let status = scheduler.status(&layout).await?;

  println!("Progress file: {}", layout.progress_file.display());
  println!("Universe:      {} symbols", scheduler.config().universe.len());
  println!("Fetched:       {}", status.fetched);
  println!("Pending:       {}", status.pending);
  println!(
    "Next batch:    {} ({} per run{})",
    status.next.symbols.join(", "),
    scheduler.config().symbols_per_run(),
    if status.next.reset { ", starts a new cycle" } else { "" }
  );

  Ok(())
}
