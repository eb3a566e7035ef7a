//! Where statement documents come from

use async_trait::async_trait;
use serde_json::Value;
use stmt_client::AlphaVantageClient;
use stmt_core::{Result, StatementFunction};

/// Supplies raw statement documents for (symbol, function) pairs.
///
/// Implementations return the document verbatim and must reject responses
/// that carry no `symbol`.
#[async_trait]
pub trait StatementSource: Send + Sync {
  async fn fetch_statement(&self, symbol: &str, function: StatementFunction) -> Result<Value>;
}

#[async_trait]
impl StatementSource for AlphaVantageClient {
  async fn fetch_statement(&self, symbol: &str, function: StatementFunction) -> Result<Value> {
    self.fundamentals().statement(symbol, function).await
  }
}
