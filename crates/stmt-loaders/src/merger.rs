//! Combines the per-function statement files of a symbol into one summary

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stmt_core::StatementFunction;
use stmt_models::{Period, RawStatement, Report, Summary};
use tracing::{debug, error, info, warn};

use crate::{DataLayout, LoaderError, LoaderResult, storage};

/// A parsed statement and where it came from
#[derive(Debug, Clone)]
pub struct SourceDocument {
  pub function: StatementFunction,
  /// File the document was read from, used in error messages
  pub origin: String,
  pub statement: RawStatement,
}

/// Merge statement documents into one summary.
///
/// Documents are applied in canonical function order whatever order they are
/// given in. Reports sharing a fiscal date are merged field by field and the
/// later function wins on conflicts. The summary symbol is the first
/// non-empty `symbol` seen, or `requested` when no document carries one; a
/// document naming a different symbol is rejected. Reports are returned in
/// ascending fiscal date order.
pub fn merge_documents(
  requested: &str,
  mut documents: Vec<SourceDocument>,
) -> LoaderResult<Summary> {
  documents.sort_by_key(|d| d.function);

  let mut symbol: Option<String> = None;
  let mut annual: BTreeMap<String, Report> = BTreeMap::new();
  let mut quarterly: BTreeMap<String, Report> = BTreeMap::new();

  for mut doc in documents {
    let found = doc.statement.symbol.trim();
    if !found.is_empty() {
      let expected = symbol.get_or_insert_with(|| found.to_string());
      if expected != found {
        return Err(LoaderError::SymbolMismatch {
          expected: expected.clone(),
          found: found.to_string(),
          path: doc.origin,
        });
      }
    }

    for period in Period::ALL {
      let by_date = match period {
        Period::Annual => &mut annual,
        Period::Quarterly => &mut quarterly,
      };

      for report in doc.statement.take_reports(period) {
        let Some(date) = report.fiscal_date_ending().map(str::to_string) else {
          warn!("Skipping {} report without fiscalDateEnding in {}", period.key(), doc.origin);
          continue;
        };
        by_date.entry(date).or_default().merge(report);
      }
    }
  }

  Ok(Summary {
    symbol: symbol.unwrap_or_else(|| requested.to_string()),
    annual_reports: annual.into_values().collect(),
    quarterly_reports: quarterly.into_values().collect(),
  })
}

/// Outcome of a summary generation pass
#[derive(Debug, Default)]
pub struct SummaryRunReport {
  /// Symbols whose summary was written
  pub written: Vec<String>,
  /// Symbols that failed, with the reason
  pub failed: Vec<(String, LoaderError)>,
}

impl SummaryRunReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Reads statement files from a [`DataLayout`] and writes summaries into it
#[derive(Debug, Clone)]
pub struct StatementMerger {
  layout: DataLayout,
  functions: Vec<StatementFunction>,
}

impl StatementMerger {
  pub fn new(layout: DataLayout, functions: &[StatementFunction]) -> Self {
    Self { layout, functions: stmt_core::canonical_functions(functions) }
  }

  /// Merge the given files for `symbol`. Every file must exist and parse.
  pub async fn merge(
    &self,
    symbol: &str,
    sources: &[(StatementFunction, PathBuf)],
  ) -> LoaderResult<Summary> {
    let mut documents = Vec::with_capacity(sources.len());
    for (function, path) in sources {
      documents.push(read_source(symbol, *function, path).await?);
    }
    merge_documents(symbol, documents)
  }

  /// Merge the configured functions' files for `symbol` and write
  /// `{summary_dir}/{symbol}.json`. Nothing is written when any input is
  /// missing or malformed.
  pub async fn merge_and_save(&self, symbol: &str) -> LoaderResult<PathBuf> {
    let sources: Vec<(StatementFunction, PathBuf)> =
      self.functions.iter().map(|f| (*f, self.layout.statement_path(*f, symbol))).collect();

    let summary = self.merge(symbol, &sources).await?;

    let path = self.layout.summary_path(symbol);
    storage::write_json_pretty(&path, &summary).await?;
    debug!(
      "{}: {} annual and {} quarterly reports",
      symbol,
      summary.annual_reports.len(),
      summary.quarterly_reports.len()
    );
    Ok(path)
  }

  /// Whether any configured statement file exists for `symbol`
  pub async fn has_statements(&self, symbol: &str) -> bool {
    for function in &self.functions {
      let path = self.layout.statement_path(*function, symbol);
      if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return true;
      }
    }
    false
  }

  /// Write a summary for every symbol. A failing symbol is logged and
  /// reported without stopping the others. Symbols with no statement files
  /// yet are still reported but only logged at debug level.
  pub async fn generate_summaries(&self, universe: &[String]) -> SummaryRunReport {
    let mut report = SummaryRunReport::default();

    for symbol in universe {
      match self.merge_and_save(symbol).await {
        Ok(path) => {
          info!("Summary for {} saved to {}", symbol, path.display());
          report.written.push(symbol.clone());
        }
        Err(e) => {
          if matches!(e, LoaderError::MissingSource { .. }) && !self.has_statements(symbol).await {
            debug!("No statements fetched yet for {}", symbol);
          } else {
            error!("Failed to summarize {}: {}", symbol, e);
          }
          report.failed.push((symbol.clone(), e));
        }
      }
    }

    info!("Wrote {} summaries, {} failed", report.written.len(), report.failed.len());
    report
  }
}

async fn read_source(
  symbol: &str,
  function: StatementFunction,
  path: &Path,
) -> LoaderResult<SourceDocument> {
  if !tokio::fs::try_exists(path).await.map_err(|e| LoaderError::io(path, e))? {
    return Err(LoaderError::MissingSource {
      symbol: symbol.to_string(),
      function,
      path: path.display().to_string(),
    });
  }

  let statement: RawStatement = storage::read_json(path).await?;
  Ok(SourceDocument { function, origin: path.display().to_string(), statement })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::{Value, json};
  use tempfile::tempdir;

  fn doc(function: StatementFunction, value: Value) -> SourceDocument {
    SourceDocument {
      function,
      origin: format!("{}.json", function),
      statement: serde_json::from_value(value).unwrap(),
    }
  }

  fn write(layout: &DataLayout, function: StatementFunction, symbol: &str, value: Value) {
    let path = layout.statement_path(function, symbol);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
  }

  #[test]
  fn test_income_and_cash_flow_merge_into_one_report() {
    let summary = merge_documents(
      "X",
      vec![
        doc(
          StatementFunction::IncomeStatement,
          json!({"symbol": "X", "annualReports": [{"fiscalDateEnding": "2023-12-31", "revenue": 100}]}),
        ),
        doc(
          StatementFunction::CashFlow,
          json!({"symbol": "X", "annualReports": [{"fiscalDateEnding": "2023-12-31", "netIncome": 50}]}),
        ),
      ],
    )
    .unwrap();

    assert_eq!(
      serde_json::to_value(&summary).unwrap(),
      json!({
        "symbol": "X",
        "annualReports": [{"fiscalDateEnding": "2023-12-31", "revenue": 100, "netIncome": 50}],
        "quarterlyReports": []
      })
    );
  }

  #[test]
  fn test_later_function_wins_regardless_of_input_order() {
    let summary = merge_documents(
      "X",
      vec![
        doc(
          StatementFunction::CashFlow,
          json!({"symbol": "X", "quarterlyReports": [{"fiscalDateEnding": "2024-03-31", "netIncome": "C"}]}),
        ),
        doc(
          StatementFunction::BalanceSheet,
          json!({"symbol": "X", "quarterlyReports": [
            {"fiscalDateEnding": "2024-03-31", "netIncome": "B", "totalAssets": "10"}
          ]}),
        ),
      ],
    )
    .unwrap();

    let report = summary.report_for(Period::Quarterly, "2024-03-31").unwrap();
    assert_eq!(report.get("netIncome"), Some(&json!("C")));
    assert_eq!(report.get("totalAssets"), Some(&json!("10")));
  }

  #[test]
  fn test_one_report_per_fiscal_date_sorted_ascending() {
    let summary = merge_documents(
      "X",
      vec![
        doc(
          StatementFunction::IncomeStatement,
          json!({"symbol": "X", "annualReports": [
            {"fiscalDateEnding": "2023-12-31", "revenue": 3},
            {"fiscalDateEnding": "2021-12-31", "revenue": 1}
          ]}),
        ),
        doc(
          StatementFunction::BalanceSheet,
          json!({"symbol": "X", "annualReports": [
            {"fiscalDateEnding": "2022-12-31", "assets": 2},
            {"fiscalDateEnding": "2023-12-31", "assets": 3}
          ]}),
        ),
      ],
    )
    .unwrap();

    let dates: Vec<&str> =
      summary.annual_reports.iter().filter_map(|r| r.fiscal_date_ending()).collect();
    assert_eq!(dates, vec!["2021-12-31", "2022-12-31", "2023-12-31"]);
    assert_eq!(summary.annual_reports[2].len(), 3);
  }

  #[test]
  fn test_reports_without_fiscal_date_are_skipped() {
    let summary = merge_documents(
      "X",
      vec![doc(
        StatementFunction::IncomeStatement,
        json!({"symbol": "X", "annualReports": [{"revenue": 1}, {"fiscalDateEnding": "2023-12-31"}]}),
      )],
    )
    .unwrap();

    assert_eq!(summary.annual_reports.len(), 1);
  }

  #[test]
  fn test_symbol_mismatch_is_an_error() {
    let result = merge_documents(
      "X",
      vec![
        doc(StatementFunction::IncomeStatement, json!({"symbol": "X"})),
        doc(StatementFunction::CashFlow, json!({"symbol": "Y"})),
      ],
    );

    match result {
      Err(LoaderError::SymbolMismatch { expected, found, path }) => {
        assert_eq!(expected, "X");
        assert_eq!(found, "Y");
        assert_eq!(path, "CASH_FLOW.json");
      }
      other => panic!("Expected SymbolMismatch, got {:?}", other),
    }
  }

  #[test]
  fn test_requested_symbol_used_when_documents_have_none() {
    let summary =
      merge_documents("X", vec![doc(StatementFunction::IncomeStatement, json!({"annualReports": []}))])
        .unwrap();

    assert_eq!(summary.symbol, "X");
  }

  #[test]
  fn test_single_function_keeps_its_reports() {
    let summary = merge_documents(
      "X",
      vec![doc(
        StatementFunction::BalanceSheet,
        json!({"symbol": "X", "quarterlyReports": [
          {"fiscalDateEnding": "2024-06-30", "totalAssets": "2"},
          {"fiscalDateEnding": "2024-03-31", "totalAssets": "1"}
        ]}),
      )],
    )
    .unwrap();

    assert_eq!(
      serde_json::to_value(&summary.quarterly_reports).unwrap(),
      json!([
        {"fiscalDateEnding": "2024-03-31", "totalAssets": "1"},
        {"fiscalDateEnding": "2024-06-30", "totalAssets": "2"}
      ])
    );
  }

  #[tokio::test]
  async fn test_merge_and_save_writes_summary() {
    let dir = tempdir().unwrap();
    let layout = DataLayout::rooted_at(dir.path());
    write(
      &layout,
      StatementFunction::IncomeStatement,
      "X",
      json!({"symbol": "X", "annualReports": [{"fiscalDateEnding": "2023-12-31", "revenue": 100}]}),
    );
    write(
      &layout,
      StatementFunction::CashFlow,
      "X",
      json!({"symbol": "X", "annualReports": [{"fiscalDateEnding": "2023-12-31", "netIncome": 50}]}),
    );
    let merger = StatementMerger::new(
      layout.clone(),
      &[StatementFunction::CashFlow, StatementFunction::IncomeStatement],
    );

    let path = merger.merge_and_save("X").await.unwrap();

    assert_eq!(path, dir.path().join("data/SUMMARY/X.json"));
    let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(
      written["annualReports"],
      json!([{"fiscalDateEnding": "2023-12-31", "revenue": 100, "netIncome": 50}])
    );
  }

  #[tokio::test]
  async fn test_missing_source_writes_nothing() {
    let dir = tempdir().unwrap();
    let layout = DataLayout::rooted_at(dir.path());
    write(&layout, StatementFunction::IncomeStatement, "X", json!({"symbol": "X"}));
    let merger = StatementMerger::new(layout.clone(), &StatementFunction::ALL);

    let result = merger.merge_and_save("X").await;

    assert!(matches!(
      result,
      Err(LoaderError::MissingSource { function: StatementFunction::BalanceSheet, .. })
    ));
    assert!(!layout.summary_path("X").exists());
  }

  #[tokio::test]
  async fn test_generate_summaries_isolates_failures() {
    let dir = tempdir().unwrap();
    let layout = DataLayout::rooted_at(dir.path());
    write(
      &layout,
      StatementFunction::CashFlow,
      "GOOD",
      json!({"symbol": "GOOD", "annualReports": [{"fiscalDateEnding": "2023-12-31"}]}),
    );
    let bad = layout.statement_path(StatementFunction::CashFlow, "BAD");
    std::fs::write(&bad, "{truncated").unwrap();
    let merger = StatementMerger::new(layout.clone(), &[StatementFunction::CashFlow]);

    let report = merger
      .generate_summaries(&["BAD".to_string(), "MISSING".to_string(), "GOOD".to_string()])
      .await;

    assert_eq!(report.written, vec!["GOOD".to_string()]);
    assert_eq!(report.failed.len(), 2);
    assert!(matches!(report.failed[0], (ref s, LoaderError::SerializationError(_)) if s == "BAD"));
    assert!(matches!(report.failed[1], (ref s, LoaderError::MissingSource { .. }) if s == "MISSING"));
    assert!(!report.is_success());
    assert!(layout.summary_path("GOOD").exists());
  }

  #[tokio::test]
  async fn test_has_statements_tracks_fetched_files() {
    let dir = tempdir().unwrap();
    let layout = DataLayout::rooted_at(dir.path());
    let merger = StatementMerger::new(layout.clone(), &StatementFunction::ALL);
    assert!(!merger.has_statements("IBM").await);

    write(&layout, StatementFunction::BalanceSheet, "IBM", json!({"symbol": "IBM"}));

    assert!(merger.has_statements("IBM").await);
    assert!(!merger.has_statements("MSFT").await);
  }

  #[tokio::test]
  async fn test_unfetched_and_partial_symbols_both_fail() {
    let dir = tempdir().unwrap();
    let layout = DataLayout::rooted_at(dir.path());
    write(
      &layout,
      StatementFunction::IncomeStatement,
      "PART",
      json!({"symbol": "PART", "annualReports": []}),
    );
    let merger = StatementMerger::new(layout.clone(), &StatementFunction::ALL);

    let report = merger.generate_summaries(&["NEW".to_string(), "PART".to_string()]).await;

    assert!(report.written.is_empty());
    assert!(matches!(report.failed[0], (ref s, LoaderError::MissingSource { .. }) if s == "NEW"));
    assert!(matches!(report.failed[1], (ref s, LoaderError::MissingSource { .. }) if s == "PART"));
    assert!(!merger.has_statements("NEW").await);
    assert!(merger.has_statements("PART").await);
  }
}
