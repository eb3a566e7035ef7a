use super::{DirectRateLimiter, EndpointBase, impl_endpoint_base};
use crate::transport::{Transport, diagnostic};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use stmt_core::{Error, Result, StatementFunction};
use stmt_models::RawStatement;
use tracing::{debug, instrument};

/// Financial statement endpoints
pub struct FundamentalsEndpoints {
  transport: Arc<Transport>,
  rate_limiter: Arc<DirectRateLimiter>,
}

impl FundamentalsEndpoints {
  /// Create a new fundamentals endpoints instance
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<DirectRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }

  /// Fetch one statement as the raw JSON document returned by the API
  ///
  /// The document is only accepted when it carries a non-empty `symbol`;
  /// anything else (quota notes, empty objects for unknown tickers) is
  /// reported as [`Error::InvalidResponse`] with the API's explanation.
  ///
  /// # Arguments
  ///
  /// * `symbol` - The stock symbol (e.g., "AAPL", "MSFT")
  /// * `function` - Which statement to fetch
  ///
  /// # Examples
  ///
  /// ```ignore
  /// let doc = client.fundamentals().statement("IBM", StatementFunction::CashFlow).await?;
  /// std::fs::write("IBM.json", serde_json::to_string_pretty(&doc)?)?;
  /// ```
  #[instrument(skip(self))]
  pub async fn statement(&self, symbol: &str, function: StatementFunction) -> Result<Value> {
    self.wait_for_rate_limit().await?;

    let mut params = HashMap::new();
    params.insert("symbol".to_string(), symbol.to_string());

    let response: Value = self.transport().get(function, params).await?;

    match RawStatement::symbol_of(&response) {
      Some(found) => {
        debug!("Received {} for {}", function, found);
        Ok(response)
      }
      None => Err(Error::InvalidResponse(diagnostic(&response))),
    }
  }

  /// Get annual and quarterly income statements
  ///
  /// # Arguments
  ///
  /// * `symbol` - The stock symbol
  pub async fn income_statement(&self, symbol: &str) -> Result<RawStatement> {
    self.typed_statement(symbol, StatementFunction::IncomeStatement).await
  }

  /// Get annual and quarterly balance sheets
  ///
  /// # Arguments
  ///
  /// * `symbol` - The stock symbol
  pub async fn balance_sheet(&self, symbol: &str) -> Result<RawStatement> {
    self.typed_statement(symbol, StatementFunction::BalanceSheet).await
  }

  /// Get annual and quarterly cash flow statements
  ///
  /// # Arguments
  ///
  /// * `symbol` - The stock symbol
  pub async fn cash_flow(&self, symbol: &str) -> Result<RawStatement> {
    self.typed_statement(symbol, StatementFunction::CashFlow).await
  }

  async fn typed_statement(&self, symbol: &str, function: StatementFunction) -> Result<RawStatement> {
    let raw = self.statement(symbol, function).await?;
    serde_json::from_value(raw).map_err(Error::from)
  }
}

impl_endpoint_base!(FundamentalsEndpoints);
