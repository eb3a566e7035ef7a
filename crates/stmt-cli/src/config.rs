use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use stmt_core::{DEFAULT_DAILY_LIMIT, DEFAULT_UNIVERSE, StatementFunction, normalize_universe};
use stmt_loaders::{DataLayout, LoaderConfig, SchedulerConfig};

/// Universe, budget and file locations shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct Settings {
  /// Symbols to process (comma-separated)
  #[arg(short, long, env = "STMT_SYMBOLS", value_delimiter = ',')]
  pub symbols: Option<Vec<String>>,

  /// File containing symbols (one per line, `#` starts a comment)
  #[arg(short = 'f', long)]
  pub symbols_file: Option<PathBuf>,

  /// API requests allowed per run
  #[arg(short = 'l', long, env = "AV_DAILY_LIMIT", default_value_t = DEFAULT_DAILY_LIMIT)]
  pub daily_limit: usize,

  /// Statements to fetch and merge (comma-separated)
  #[arg(
    long,
    env = "STMT_FUNCTIONS",
    value_delimiter = ',',
    default_values_t = StatementFunction::ALL
  )]
  pub functions: Vec<StatementFunction>,

  /// Directory for per-statement files
  #[arg(long, env = "STMT_DATA_DIR", default_value = "data")]
  pub data_dir: PathBuf,

  /// Directory for summaries [default: <data-dir>/SUMMARY]
  #[arg(long, env = "STMT_SUMMARY_DIR")]
  pub summary_dir: Option<PathBuf>,

  /// Record of symbols fetched in the current cycle
  #[arg(long, env = "STMT_PROGRESS_FILE", default_value = "fetched_symbols.json")]
  pub progress_file: PathBuf,

  /// Hide the progress bar
  #[arg(long)]
  pub no_progress: bool,
}

impl Settings {
  /// Symbols from the file if given, else from `--symbols`, else the
  /// built-in universe
  pub fn universe(&self) -> Result<Vec<String>> {
    let raw = if let Some(file) = &self.symbols_file {
      read_symbols_file(file)?
    } else if let Some(symbols) = &self.symbols {
      symbols.clone()
    } else {
      DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect()
    };

    Ok(normalize_universe(raw)?)
  }

  pub fn layout(&self) -> DataLayout {
    let summary_dir = self.summary_dir.clone().unwrap_or_else(|| self.data_dir.join("SUMMARY"));
    DataLayout::new(self.data_dir.clone(), summary_dir, self.progress_file.clone())
  }

  pub fn scheduler_config(&self) -> Result<SchedulerConfig> {
    Ok(SchedulerConfig::new(self.universe()?, self.daily_limit, &self.functions)?)
  }

  pub fn loader_config(&self) -> LoaderConfig {
    LoaderConfig { show_progress: !self.no_progress }
  }
}

/// Read one symbol per line, ignoring blank lines and `#` comments
pub fn read_symbols_file(path: &Path) -> Result<Vec<String>> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read symbols file {}", path.display()))?;

  Ok(
    content
      .lines()
      .map(|line| line.split('#').next().unwrap_or_default().trim())
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser, Debug)]
  struct TestCli {
    #[command(flatten)]
    settings: Settings,
  }

  fn parse(args: &[&str]) -> Settings {
    TestCli::try_parse_from(std::iter::once("stmt").chain(args.iter().copied()))
      .unwrap()
      .settings
  }

  #[test]
  fn test_defaults() {
    let settings = parse(&[]);

    assert_eq!(settings.daily_limit, 25);
    assert_eq!(settings.functions, StatementFunction::ALL.to_vec());
    assert_eq!(settings.universe().unwrap(), vec!["AAPL", "GOOGL", "MSFT", "TSLA", "V", "AMZN"]);

    let layout = settings.layout();
    assert_eq!(layout.data_dir, PathBuf::from("data"));
    assert_eq!(layout.summary_dir, PathBuf::from("data/SUMMARY"));
    assert_eq!(layout.progress_file, PathBuf::from("fetched_symbols.json"));
    assert!(settings.loader_config().show_progress);
  }

  #[test]
  fn test_symbols_and_functions_flags() {
    let settings = parse(&[
      "--symbols",
      "ibm, msft,IBM",
      "--functions",
      "cash_flow,income-statement",
      "--daily-limit",
      "10",
      "--no-progress",
    ]);

    assert_eq!(settings.universe().unwrap(), vec!["IBM", "MSFT"]);
    let config = settings.scheduler_config().unwrap();
    assert_eq!(
      config.functions,
      vec![StatementFunction::IncomeStatement, StatementFunction::CashFlow]
    );
    assert_eq!(config.symbols_per_run(), 5);
    assert!(!settings.loader_config().show_progress);
  }

  #[test]
  fn test_unknown_function_rejected() {
    let result = TestCli::try_parse_from(["stmt", "--functions", "EARNINGS"]);
    assert!(result.is_err());
  }

  #[test]
  fn test_budget_too_small_for_functions() {
    let settings = parse(&["--daily-limit", "2"]);
    assert!(settings.scheduler_config().is_err());
  }

  #[test]
  fn test_symbols_file_wins_and_skips_comments() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("symbols.txt");
    std::fs::write(&file, "# watchlist\naapl\n\n  tsla  # cars\n").unwrap();
    let file_arg = file.display().to_string();

    let settings = parse(&["--symbols", "IBM", "--symbols-file", &file_arg]);

    assert_eq!(settings.universe().unwrap(), vec!["AAPL", "TSLA"]);
  }

  #[test]
  fn test_path_like_symbol_rejected() {
    let settings = parse(&["--symbols", "AAPL,../../escape"]);
    assert!(settings.universe().is_err());
    assert!(settings.scheduler_config().is_err());
  }

  #[test]
  fn test_missing_symbols_file() {
    let settings = parse(&["--symbols-file", "/nonexistent/symbols.txt"]);
    assert!(settings.universe().is_err());
  }

  #[test]
  fn test_custom_summary_dir() {
    let settings = parse(&["--data-dir", "out", "--summary-dir", "summaries"]);
    assert_eq!(settings.layout().summary_dir, PathBuf::from("summaries"));
    assert_eq!(
      settings.layout().statement_path(StatementFunction::CashFlow, "X"),
      PathBuf::from("out/CASH_FLOW/X.json")
    );
  }
}
