mod parser;

use crate::workflows::financials::{CashFlowEntry, FinancialsValidationError};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum CashFlowImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, reason: String },
}

impl std::fmt::Display for CashFlowImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashFlowImportError::Io(err) => {
                write!(f, "failed to read cash-flow statement: {}", err)
            }
            CashFlowImportError::Csv(err) => write!(f, "invalid cash-flow CSV data: {}", err),
            CashFlowImportError::Row { line, reason } => {
                write!(f, "cash-flow statement line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for CashFlowImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CashFlowImportError::Io(err) => Some(err),
            CashFlowImportError::Csv(err) => Some(err),
            CashFlowImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for CashFlowImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CashFlowImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `Month,Income,Expenses,Balance` statements into a chronological
/// cash-flow history keyed `YYYY-MM`.
pub struct CashFlowStatementImporter;

impl CashFlowStatementImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CashFlowEntry>, CashFlowImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CashFlowEntry>, CashFlowImportError> {
        let mut by_month = BTreeMap::new();

        for record in parser::parse_records(reader)? {
            let line = record.line;
            let row_error = |reason: String| CashFlowImportError::Row { line, reason };

            let month = record.month.map_err(row_error)?;
            let entry = CashFlowEntry::new(
                month.format("%Y-%m").to_string(),
                record.income.map_err(row_error)?,
                record.expenses.map_err(row_error)?,
                record.balance.map_err(row_error)?,
            );
            entry
                .validate()
                .map_err(|err: FinancialsValidationError| row_error(err.to_string()))?;

            if by_month.insert(month, entry).is_some() {
                return Err(row_error(format!(
                    "duplicate month {}",
                    month.format("%Y-%m")
                )));
            }
        }

        Ok(by_month.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn importer_sorts_months_chronologically() {
        let csv = "Month,Income,Expenses,Balance\n\
Mar 2025,\"$12,000\",\"$9,500\",\"$14,500\"\n\
2025-01,10000,8000,10000\n\
February 2025,11000,8500,12500\n";

        let entries =
            CashFlowStatementImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let months: Vec<&str> = entries.iter().map(|entry| entry.month.as_str()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(entries[2].income, 12_000.0);
        assert_eq!(entries[2].balance, 14_500.0);
    }

    #[test]
    fn importer_accepts_lowercase_headers_and_overdrafts() {
        let csv = "month,income,expenses,balance\n2025-01,100,400,(300)\n";
        let entries =
            CashFlowStatementImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(entries[0].balance, -300.0);
    }

    #[test]
    fn importer_rejects_negative_income_with_line_number() {
        let csv = "Month,Income,Expenses,Balance\n2025-01,100,50,50\n2025-02,-10,50,0\n";
        let error = CashFlowStatementImporter::from_reader(Cursor::new(csv))
            .expect_err("negative income rejected");

        match error {
            CashFlowImportError::Row { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("income"));
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_duplicate_months() {
        let csv = "Month,Income,Expenses,Balance\n2025-01,1,1,0\nJan 2025,2,2,0\n";
        let error = CashFlowStatementImporter::from_reader(Cursor::new(csv))
            .expect_err("duplicate rejected");
        assert!(error.to_string().contains("duplicate month 2025-01"));
    }

    #[test]
    fn importer_reports_unparseable_amounts() {
        let csv = "Month,Income,Expenses,Balance\n2025-01,lots,1,0\n";
        let error = CashFlowStatementImporter::from_reader(Cursor::new(csv))
            .expect_err("bad amount rejected");
        assert!(error.to_string().contains("invalid amount 'lots'"));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = CashFlowStatementImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        match error {
            CashFlowImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
