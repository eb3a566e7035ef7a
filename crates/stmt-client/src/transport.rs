//! HTTP transport layer for AlphaVantage API requests
//!
//! One attempt per request, bounded by the configured timeout. Failed requests
//! are reported to the caller and never retried here.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use stmt_core::{Config, Error, Result, StatementFunction};
use tracing::{debug, error, instrument};
use url::Url;

/// HTTP transport layer for making requests to the AlphaVantage API
pub struct Transport {
  client: Client,
  base_url: String,
  api_key: String,
  timeout: Duration,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config) -> Result<Self> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("stmt-client/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      timeout,
    })
  }

  /// Create a mock transport for testing
  #[cfg(test)]
  pub fn new_mock() -> Self {
    Self {
      client: Client::new(),
      base_url: "https://mock.alphavantage.co".to_string(),
      api_key: "test_key".to_string(),
      timeout: Duration::from_secs(30),
    }
  }

  /// Make a GET request to the AlphaVantage API
  ///
  /// # Arguments
  ///
  /// * `function` - The AlphaVantage API function to call
  /// * `params` - Additional query parameters for the request
  ///
  /// # Returns
  ///
  /// The deserialized response, or an error when the request fails, the
  /// status is not 2xx, the body is not JSON, or the body is an API error or
  /// quota message.
  #[instrument(skip_all, fields(function = %function))]
  pub async fn get<T>(&self, function: StatementFunction, params: HashMap<String, String>) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.build_url(function, params)?;
    debug!("Making request to: {}", redact_api_key(&url));

    let response = self.make_request(url).await?;
    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    debug!("Response body length: {} bytes", text.len());

    let value: Value = serde_json::from_str(&text).map_err(|e| {
      error!("Response text (first 500 chars): {}", truncate(&text, 500));
      Error::Parse(format!("Failed to parse response: {}. Response: {}", e, truncate(&text, 200)))
    })?;

    check_api_error(&value)?;

    serde_json::from_value(value).map_err(Error::from)
  }

  /// Build the full URL for an API request
  fn build_url(&self, function: StatementFunction, params: HashMap<String, String>) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/query", self.base_url))
      .map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;

    {
      let mut query_pairs = url.query_pairs_mut();
      query_pairs.append_pair("function", function.as_str());
      // Sorted so the URL is stable for a given parameter set
      let mut params: Vec<(String, String)> = params.into_iter().collect();
      params.sort();
      for (key, value) in &params {
        query_pairs.append_pair(key, value);
      }
      query_pairs.append_pair("apikey", &self.api_key);
    }

    Ok(url)
  }

  /// Make the actual HTTP request
  async fn make_request(&self, url: Url) -> Result<Response> {
    let response = self.client.get(url).send().await.map_err(|e| {
      if e.is_timeout() {
        Error::Http(format!("Request timed out after {}s", self.timeout.as_secs()))
      } else {
        Error::Http(format!("Request failed: {}", e.without_url()))
      }
    })?;

    let status = response.status();

    if status.is_success() {
      debug!("Request successful with status: {}", status);
      Ok(response)
    } else {
      error!("Request failed with status: {}", status);
      Err(Error::Http(format!("HTTP error: {}", status)))
    }
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .finish()
  }
}

/// Check for AlphaVantage API error messages in the response.
///
/// AlphaVantage answers 200 OK with a one-field object when a request is
/// rejected: `Error Message` for bad calls, `Note` or `Information` for quota
/// messages.
pub(crate) fn check_api_error(response: &Value) -> Result<()> {
  if let Some(message) = response.get("Error Message").and_then(Value::as_str) {
    return Err(Error::Api(message.to_string()));
  }

  for key in ["Note", "Information"] {
    if let Some(message) = response.get(key).and_then(Value::as_str) {
      let lower = message.to_lowercase();
      if lower.contains("call frequency")
        || lower.contains("rate limit")
        || lower.contains("requests per day")
      {
        return Err(Error::RateLimit(message.to_string()));
      }
      if lower.contains("api key") {
        return Err(Error::ApiKey(message.to_string()));
      }
    }
  }

  Ok(())
}

/// Human readable reason a response carries no statement data
pub(crate) fn diagnostic(response: &Value) -> String {
  ["Note", "Information", "Error Message"]
    .iter()
    .find_map(|key| response.get(*key).and_then(Value::as_str))
    .unwrap_or("No valid data")
    .to_string()
}

fn redact_api_key(url: &Url) -> String {
  let mut redacted = url.clone();
  let pairs: Vec<(String, String)> = url
    .query_pairs()
    .map(|(k, v)| {
      let v = if k == "apikey" { "***".to_string() } else { v.into_owned() };
      (k.into_owned(), v)
    })
    .collect();
  redacted.query_pairs_mut().clear().extend_pairs(pairs);
  redacted.to_string()
}

fn truncate(text: &str, max: usize) -> &str {
  match text.char_indices().nth(max) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
