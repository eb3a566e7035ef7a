use anyhow::{Result, bail};
use stmt_loaders::StatementMerger;

use crate::config::Settings;

/// Merge the stored statements of every symbol into summaries.
///
/// Fails after processing the whole universe when any symbol could not be
/// summarized.
pub async fn execute(settings: &Settings) -> Result<()> {
  let universe = settings.universe()?;
  let merger = StatementMerger::new(settings.layout(), &settings.functions);

  let report = merger.generate_summaries(&universe).await;

  println!("Wrote {} summaries to {}", report.written.len(), settings.layout().summary_dir.display());
  for (symbol, error) in &report.failed {
    eprintln!("  {}: {}", symbol, error);
  }

  if !report.is_success() {
    bail!("{} of {} summaries failed", report.failed.len(), universe.len());
  }
  Ok(())
}
