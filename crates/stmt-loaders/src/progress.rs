//! Persisted record of symbols already fetched
//!
//! The record is a JSON array of symbols in fetch order. It is read once at
//! the start of a run and overwritten once at the end.

use crate::{LoaderError, LoaderResult, storage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Symbols fetched so far in the current cycle, in fetch order, no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedProgress {
  symbols: Vec<String>,
}

impl FetchedProgress {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build from a list, keeping the first occurrence of repeated symbols
  pub fn from_symbols<I, S>(symbols: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut progress = Self::new();
    for symbol in symbols {
      progress.push(symbol);
    }
    progress
  }

  /// Append a symbol. Returns `false` when it was already recorded.
  pub fn push(&mut self, symbol: impl Into<String>) -> bool {
    let symbol = symbol.into();
    if self.contains(&symbol) {
      false
    } else {
      self.symbols.push(symbol);
      true
    }
  }

  pub fn contains(&self, symbol: &str) -> bool {
    self.symbols.iter().any(|s| s == symbol)
  }

  /// Forget everything, starting a new cycle
  pub fn clear(&mut self) {
    self.symbols.clear();
  }

  pub fn symbols(&self) -> &[String] {
    &self.symbols
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }
}

/// Loads and saves [`FetchedProgress`] as a JSON file
#[derive(Debug, Clone)]
pub struct ProgressStore {
  path: PathBuf,
}

impl ProgressStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the record. A missing file is an empty record; a file that is not
  /// a JSON array of strings is [`LoaderError::CorruptProgress`].
  pub async fn load(&self) -> LoaderResult<FetchedProgress> {
    let content = match tokio::fs::read_to_string(&self.path).await {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        info!("No progress file at {}, starting fresh", self.path.display());
        return Ok(FetchedProgress::new());
      }
      Err(e) => return Err(LoaderError::io(&self.path, e)),
    };

    let symbols: Vec<String> =
      serde_json::from_str(&content).map_err(|e| LoaderError::CorruptProgress {
        path: self.path.display().to_string(),
        message: e.to_string(),
      })?;

    let total = symbols.len();
    let progress = FetchedProgress::from_symbols(symbols);
    if progress.len() < total {
      warn!(
        "Progress file {} listed {} duplicate symbols, ignoring repeats",
        self.path.display(),
        total - progress.len()
      );
    }

    debug!("Loaded {} fetched symbols from {}", progress.len(), self.path.display());
    Ok(progress)
  }

  /// Overwrite the record.
  ///
  /// Written to a sibling temp file first and renamed into place so a crash
  /// mid-write leaves the previous record intact.
  pub async fn save(&self, progress: &FetchedProgress) -> LoaderResult<()> {
    let json = serde_json::to_vec(progress.symbols())?;
    storage::write_atomic(&self.path, json).await?;

    debug!("Saved {} fetched symbols to {}", progress.len(), self.path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn test_push_ignores_duplicates() {
    let mut progress = FetchedProgress::new();
    assert!(progress.push("AAPL"));
    assert!(progress.push("MSFT"));
    assert!(!progress.push("AAPL"));
    assert_eq!(progress.symbols(), &["AAPL".to_string(), "MSFT".to_string()]);
  }

  #[tokio::test]
  async fn test_load_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let store = ProgressStore::new(dir.path().join("fetched_symbols.json"));

    let progress = store.load().await.unwrap();

    assert!(progress.is_empty());
  }

  #[tokio::test]
  async fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let store = ProgressStore::new(dir.path().join("fetched_symbols.json"));

    store.save(&FetchedProgress::from_symbols(["A", "B"])).await.unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(raw, r#"["A","B"]"#);
    assert_eq!(store.load().await.unwrap().symbols(), &["A".to_string(), "B".to_string()]);
    assert!(!dir.path().join("fetched_symbols.json.tmp").exists());
  }

  #[tokio::test]
  async fn test_save_overwrites() {
    let dir = tempdir().unwrap();
    let store = ProgressStore::new(dir.path().join("fetched_symbols.json"));

    store.save(&FetchedProgress::from_symbols(["A", "B", "C"])).await.unwrap();
    store.save(&FetchedProgress::from_symbols(["A"])).await.unwrap();

    assert_eq!(store.load().await.unwrap().symbols(), &["A".to_string()]);
  }

  #[tokio::test]
  async fn test_save_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let store = ProgressStore::new(dir.path().join("state/nested/progress.json"));

    store.save(&FetchedProgress::from_symbols(["X"])).await.unwrap();

    assert!(store.path().exists());
  }

  #[tokio::test]
  async fn test_malformed_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fetched_symbols.json");
    std::fs::write(&path, "[\"AAPL\", ").unwrap();

    let result = ProgressStore::new(&path).load().await;

    match result {
      Err(LoaderError::CorruptProgress { path: p, .. }) => assert!(p.ends_with("fetched_symbols.json")),
      other => panic!("Expected CorruptProgress, got {:?}", other),
    }
    // The corrupt file is left for the operator to inspect
    assert!(path.exists());
  }

  #[tokio::test]
  async fn test_wrong_shape_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fetched_symbols.json");
    std::fs::write(&path, r#"{"symbols": ["AAPL"]}"#).unwrap();

    let result = ProgressStore::new(&path).load().await;

    assert!(matches!(result, Err(LoaderError::CorruptProgress { .. })));
  }

  #[tokio::test]
  async fn test_duplicates_collapsed_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fetched_symbols.json");
    std::fs::write(&path, r#"["A","B","A"]"#).unwrap();

    let progress = ProgressStore::new(&path).load().await.unwrap();

    assert_eq!(progress.len(), 2);
  }
}
