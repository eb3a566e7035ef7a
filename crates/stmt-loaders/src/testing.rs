//! In-memory statement source for tests

use crate::StatementSource;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stmt_core::{Error, Result, StatementFunction};

pub type CallLog = Arc<Mutex<Vec<(String, StatementFunction)>>>;

/// Serves canned documents and records every request. Pairs without a
/// document fail the way the API does when a symbol is unknown.
#[derive(Default)]
pub struct FakeSource {
  documents: HashMap<(String, StatementFunction), Value>,
  answer_everything: bool,
  calls: CallLog,
}

impl FakeSource {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer every request with a minimal document for the requested symbol
  pub fn answering_all() -> Self {
    Self { answer_everything: true, ..Self::default() }
  }

  pub fn with_document(mut self, symbol: &str, function: StatementFunction, doc: Value) -> Self {
    self.documents.insert((symbol.to_string(), function), doc);
    self
  }

  pub fn calls(&self) -> CallLog {
    Arc::clone(&self.calls)
  }
}

#[async_trait]
impl StatementSource for FakeSource {
  async fn fetch_statement(&self, symbol: &str, function: StatementFunction) -> Result<Value> {
    if let Ok(mut calls) = self.calls.lock() {
      calls.push((symbol.to_string(), function));
    }

    if let Some(doc) = self.documents.get(&(symbol.to_string(), function)) {
      return Ok(doc.clone());
    }
    if self.answer_everything {
      return Ok(json!({"symbol": symbol, "annualReports": [], "quarterlyReports": []}));
    }
    Err(Error::InvalidResponse("No valid data".to_string()))
  }
}
