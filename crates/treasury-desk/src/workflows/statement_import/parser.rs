use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct StatementRecord {
    pub(crate) line: u64,
    pub(crate) month: Result<NaiveDate, String>,
    pub(crate) income: Result<f64, String>,
    pub(crate) expenses: Result<f64, String>,
    pub(crate) balance: Result<f64, String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<StatementRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: StatementRow = record.deserialize(Some(&headers))?;

        records.push(StatementRecord {
            line,
            month: parse_month(&row.month),
            income: parse_amount(&row.income),
            expenses: parse_amount(&row.expenses),
            balance: parse_amount(&row.balance),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct StatementRow {
    #[serde(rename = "Month", alias = "month")]
    month: String,
    #[serde(rename = "Income", alias = "income")]
    income: String,
    #[serde(rename = "Expenses", alias = "expenses")]
    expenses: String,
    #[serde(rename = "Balance", alias = "balance")]
    balance: String,
}

/// Accepts `2025-03`, `2025-03-31`, `Mar 2025` and `March 2025`; returns the
/// first day of that month.
pub(crate) fn parse_month(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim().replace('\u{feff}', "");
    if trimmed.is_empty() {
        return Err("month is empty".to_string());
    }

    let candidates = [
        (format!("{trimmed}-01"), "%Y-%m-%d"),
        (trimmed.clone(), "%Y-%m-%d"),
        (format!("01 {trimmed}"), "%d %b %Y"),
        (format!("01 {trimmed}"), "%d %B %Y"),
    ];

    candidates
        .iter()
        .find_map(|(candidate, format)| NaiveDate::parse_from_str(candidate, format).ok())
        .map(|date| date.with_day(1).unwrap_or(date))
        .ok_or_else(|| format!("unrecognized month '{trimmed}'"))
}

/// Statement amounts: optional currency symbol, thousands separators, and
/// accounting-style parentheses for negatives.
pub(crate) fn parse_amount(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' ' | '\u{a0}'))
        .collect();

    let parsed = cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| format!("invalid amount '{trimmed}'"))?;

    Ok(if negative { -parsed } else { parsed })
}
