//! CSV parsing for bulk budget/result import.
//!
//! The file is header-based. Column names are matched case-insensitively and
//! ignore `_`, `-` and spaces, so `campaignId`, `campaign_id` and
//! `Campaign ID` are the same column. Rows are validated independently; a bad
//! row is reported with its line number and never aborts the file.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adbudget_shared::types::{CampaignId, parse_amount};

use super::error::TransferError;
use crate::planning::{BudgetAmounts, EntryKey, ResultAmounts};

/// Mandatory columns.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "campaignId",
    "year",
    "month",
    "platform",
    "operationType",
    "budgetType",
];

/// Optional value columns.
pub const OPTIONAL_COLUMNS: [&str; 5] = [
    "budgetAmount",
    "targetKpi",
    "targetValue",
    "actualSpend",
    "actualResult",
];

/// One valid import row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the file.
    pub line: u64,
    /// Composite key, trimmed and validated.
    pub key: EntryKey,
    /// Budget side, present when `budgetAmount` is filled in.
    pub budget: Option<BudgetAmounts>,
    /// Result side, present when `actualSpend` or `actualResult` is filled in.
    pub result: Option<ResultAmounts>,
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based line number in the file.
    pub line: u64,
    /// What was wrong with it.
    pub message: String,
}

impl RowError {
    /// Creates a row error.
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Result of parsing an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    /// Rows that passed validation, in file order.
    pub rows: Vec<ImportRow>,
    /// Rows that did not.
    pub errors: Vec<RowError>,
}

/// Counts reported back to the uploader once rows are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// New budget rows.
    pub budgets_created: u64,
    /// Existing budget rows overwritten.
    pub budgets_updated: u64,
    /// New result rows.
    pub results_created: u64,
    /// Existing result rows overwritten.
    pub results_updated: u64,
    /// Rows skipped, with reasons.
    pub errors: Vec<RowError>,
}

fn column_token(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps canonical column names to their index in the header.
struct ColumnMap(HashMap<&'static str, usize>);

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, TransferError> {
        let tokens: Vec<String> = headers.iter().map(column_token).collect();
        let mut map = HashMap::new();

        for name in REQUIRED_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()) {
            let wanted = column_token(name);
            if let Some(index) = tokens.iter().position(|t| *t == wanted) {
                map.insert(*name, index);
            }
        }

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !map.contains_key(*c)) {
            return Err(TransferError::MissingColumn(*missing));
        }
        Ok(Self(map))
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        self.0
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn required<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Result<&'r str, String> {
        self.get(record, column)
            .ok_or_else(|| format!("{column} is required"))
    }

    fn amount(&self, record: &csv::StringRecord, column: &str) -> Result<Option<Decimal>, String> {
        self.get(record, column)
            .map(|raw| parse_amount(raw).map_err(|e| format!("{column}: {e}")))
            .transpose()
    }
}

fn parse_record(columns: &ColumnMap, record: &csv::StringRecord, line: u64) -> Result<ImportRow, String> {
    let campaign_raw = columns.required(record, "campaignId")?;
    let campaign_id = CampaignId::from_str(campaign_raw)
        .map_err(|_| format!("campaignId '{campaign_raw}' is not a valid ID"))?;

    let year_raw = columns.required(record, "year")?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|_| format!("year '{year_raw}' is not a number"))?;
    let month_raw = columns.required(record, "month")?;
    let month = month_raw
        .parse::<u32>()
        .map_err(|_| format!("month '{month_raw}' is not a number"))?;

    let key = EntryKey {
        campaign_id,
        year,
        month,
        platform: columns.required(record, "platform")?.to_string(),
        operation_type: columns.required(record, "operationType")?.to_string(),
        budget_type: columns.required(record, "budgetType")?.to_string(),
    }
    .validated()
    .map_err(|e| e.to_string())?;

    let budget = columns
        .amount(record, "budgetAmount")?
        .map(|amount| -> Result<BudgetAmounts, String> {
            BudgetAmounts {
                amount,
                target_kpi: columns.get(record, "targetKpi").map(str::to_string),
                target_value: columns.amount(record, "targetValue")?,
            }
            .validated()
            .map_err(|e| e.to_string())
        })
        .transpose()?;

    let actual_spend = columns.amount(record, "actualSpend")?;
    let actual_result = columns.amount(record, "actualResult")?;
    let result = if actual_spend.is_some() || actual_result.is_some() {
        Some(
            ResultAmounts {
                actual_spend: actual_spend.unwrap_or_default(),
                actual_result: actual_result.unwrap_or_default(),
            }
            .validated()
            .map_err(|e| e.to_string())?,
        )
    } else {
        None
    };

    if budget.is_none() && result.is_none() {
        return Err("row has neither budgetAmount nor actualSpend/actualResult".to_string());
    }

    Ok(ImportRow {
        line,
        key,
        budget,
        result,
    })
}

/// First line that filled each side of a key.
#[derive(Default)]
struct SeenSides {
    budget: HashMap<EntryKey, u64>,
    result: HashMap<EntryKey, u64>,
}

impl SeenSides {
    /// Line of an earlier row that already filled a side `row` fills.
    fn conflict(&self, row: &ImportRow) -> Option<u64> {
        let budget = row.budget.as_ref().and_then(|_| self.budget.get(&row.key));
        let result = row.result.and_then(|_| self.result.get(&row.key));
        budget.or(result).copied()
    }

    fn record(&mut self, row: &ImportRow) {
        if row.budget.is_some() {
            self.budget.insert(row.key.clone(), row.line);
        }
        if row.result.is_some() {
            self.result.insert(row.key.clone(), row.line);
        }
    }
}

/// Parses an import file into valid rows and per-row errors.
///
/// Fails only when the header is absent or lacks a mandatory column. Budget
/// and result sides are tracked separately: a later row is rejected only when
/// it fills a side an earlier row already filled for the same key.
pub fn parse_import(input: &[u8]) -> Result<ParsedImport, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(TransferError::Empty);
    }
    let columns = ColumnMap::from_headers(&headers)?;

    let mut parsed = ParsedImport::default();
    let mut seen = SeenSides::default();

    for (index, record) in reader.records().enumerate() {
        let fallback_line = u64::try_from(index).unwrap_or(u64::MAX).saturating_add(2);
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(fallback_line, csv::Position::line);
                parsed.errors.push(RowError::new(line, e.to_string()));
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, csv::Position::line);

        if record.iter().all(str::is_empty) {
            continue;
        }

        match parse_record(&columns, &record, line) {
            Ok(row) => {
                if let Some(first) = seen.conflict(&row) {
                    parsed.errors.push(RowError::new(
                        line,
                        format!("duplicate of the key on line {first}"),
                    ));
                } else {
                    seen.record(&row);
                    parsed.rows.push(row);
                }
            }
            Err(message) => parsed.errors.push(RowError::new(line, message)),
        }
    }

    Ok(parsed)
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
