//! On-disk locations of statements, summaries and the progress record

use std::path::{Path, PathBuf};
use stmt_core::StatementFunction;

/// Where the fetcher and merger read and write their files
///
/// ```text
/// {data_dir}/INCOME_STATEMENT/{symbol}.json
/// {data_dir}/BALANCE_SHEET/{symbol}.json
/// {data_dir}/CASH_FLOW/{symbol}.json
/// {summary_dir}/{symbol}.json
/// {progress_file}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
  pub data_dir: PathBuf,
  pub summary_dir: PathBuf,
  pub progress_file: PathBuf,
}

impl DataLayout {
  pub fn new(
    data_dir: impl Into<PathBuf>,
    summary_dir: impl Into<PathBuf>,
    progress_file: impl Into<PathBuf>,
  ) -> Self {
    Self {
      data_dir: data_dir.into(),
      summary_dir: summary_dir.into(),
      progress_file: progress_file.into(),
    }
  }

  /// Layout rooted at `root`: statements under `root/data`, summaries under
  /// `root/data/SUMMARY`, progress in `root/fetched_symbols.json`
  pub fn rooted_at(root: &Path) -> Self {
    let data_dir = root.join("data");
    Self {
      summary_dir: data_dir.join("SUMMARY"),
      progress_file: root.join("fetched_symbols.json"),
      data_dir,
    }
  }

  pub fn statement_dir(&self, function: StatementFunction) -> PathBuf {
    self.data_dir.join(function.as_str())
  }

  pub fn statement_path(&self, function: StatementFunction, symbol: &str) -> PathBuf {
    self.statement_dir(function).join(format!("{}.json", symbol))
  }

  pub fn summary_path(&self, symbol: &str) -> PathBuf {
    self.summary_dir.join(format!("{}.json", symbol))
  }
}

impl Default for DataLayout {
  fn default() -> Self {
    Self::rooted_at(Path::new("."))
  }
}
