//! JSON file helpers shared by the fetcher, the progress store and the merger

use crate::{LoaderError, LoaderResult};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

/// Write `bytes` to `path` through a sibling temp file and a rename,
/// creating parent directories as needed.
pub async fn write_atomic(path: &Path, bytes: Vec<u8>) -> LoaderResult<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    tokio::fs::create_dir_all(parent).await.map_err(|e| LoaderError::io(parent, e))?;
  }

  let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  tmp_name.push(".tmp");
  let tmp = path.with_file_name(tmp_name);

  tokio::fs::write(&tmp, bytes).await.map_err(|e| LoaderError::io(&tmp, e))?;
  tokio::fs::rename(&tmp, path).await.map_err(|e| LoaderError::io(path, e))
}

/// Serialize `value` as pretty-printed JSON into `path`
pub async fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> LoaderResult<()> {
  let bytes = serde_json::to_vec_pretty(value)?;
  write_atomic(path, bytes).await
}

/// Read and parse a JSON file. Parse errors name the file.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> LoaderResult<T> {
  let content = tokio::fs::read(path).await.map_err(|e| LoaderError::io(path, e))?;
  serde_json::from_slice(&content).map_err(|e| LoaderError::parse(path, e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{Value, json};
  use tempfile::tempdir;

  #[tokio::test]
  async fn test_write_then_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("CASH_FLOW").join("IBM.json");
    let doc = json!({"symbol": "IBM", "annualReports": []});

    write_json_pretty(&path, &doc).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    let back: Value = read_json(&path).await.unwrap();
    assert_eq!(back, doc);
    assert!(!dir.path().join("CASH_FLOW").join("IBM.json.tmp").exists());
  }

  #[tokio::test]
  async fn test_read_malformed_names_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = read_json::<Value>(&path).await.unwrap_err();

    assert!(matches!(err, LoaderError::SerializationError(_)));
    assert!(err.to_string().contains("bad.json"));
  }
}
