//! Snapshot-backed transaction store
//!
//! Reads a JSON file of the shape
//!
//! ```json
//! {
//!   "income": [ ... ],
//!   "expenses": [ ... ],
//!   "totalIncome": 1200.00,
//!   "totalExpense": 1500.00
//! }
//! ```
//!
//! When the totals are absent they fall back to summing the respective
//! record lists, which for a self-contained snapshot is the same lifetime
//! set the backend would have aggregated.

use std::path::Path;

use serde::Deserialize;

use super::{audit, Store, StoreError};
use crate::util::{Amount, StoreTotals, Transaction};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snapshot {
    income: Vec<Transaction>,
    expenses: Vec<Transaction>,
    total_income: Option<Amount>,
    total_expense: Option<Amount>,
}

/// Offline store over a local JSON snapshot
#[derive(Debug)]
pub struct FileStore {
    snapshot: Snapshot,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))?;
        log::debug!(
            "loaded snapshot {}: {} income, {} expense records",
            path.display(),
            snapshot.income.len(),
            snapshot.expenses.len()
        );
        Ok(Self { snapshot })
    }
}

fn sum(records: &[Transaction]) -> Amount {
    records.iter().filter_map(|tx| tx.amount).sum()
}

impl Store for FileStore {
    fn income(&self) -> Result<Vec<Transaction>, StoreError> {
        audit(&self.snapshot.income, "income");
        Ok(self.snapshot.income.clone())
    }

    fn expenses(&self) -> Result<Vec<Transaction>, StoreError> {
        audit(&self.snapshot.expenses, "expense");
        Ok(self.snapshot.expenses.clone())
    }

    fn totals(&self) -> Result<StoreTotals, StoreError> {
        let s = &self.snapshot;
        Ok(StoreTotals {
            total_income: s.total_income.unwrap_or_else(|| sum(&s.income)),
            total_expense: s.total_expense.unwrap_or_else(|| sum(&s.expenses)),
            recent_income: Vec::new(),
            recent_expenses: Vec::new(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn store(json: &str) -> FileStore {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        FileStore::open(file.path()).unwrap()
    }

    #[test]
    fn reads_snapshot() {
        let store = store(
            r#"{
                "income": [
                    {"id": "a", "description": "pay", "amount": 2500, "date": "2024-03-01", "category": "Salary"}
                ],
                "expenses": [
                    {"id": "b", "description": "rent", "amount": 800.50, "date": "2024-03-02", "category": "Bills"}
                ],
                "totalIncome": 2500,
                "totalExpense": 800.50
            }"#,
        );
        assert_eq!(store.income().unwrap().len(), 1);
        assert_eq!(store.expenses().unwrap().len(), 1);
        let totals = store.totals().unwrap();
        assert_eq!(totals.total_income, Amount::from_cents(250000));
        assert_eq!(totals.total_expense, Amount::from_cents(80050));
    }

    #[test]
    fn totals_fall_back_to_summing() {
        let store = store(
            r#"{
                "income": [
                    {"amount": 10, "date": "2024-03-01"},
                    {"amount": 5.25, "date": "2024-03-02"}
                ],
                "expenses": [{"amount": 3, "date": "2024-03-02"}]
            }"#,
        );
        let totals = store.totals().unwrap();
        assert_eq!(totals.total_income, Amount::from_cents(1525));
        assert_eq!(totals.total_expense, Amount::from_cents(300));
    }

    #[test]
    fn malformed_rows_survive_loading() {
        let store = store(
            r#"{
                "expenses": [
                    {"amount": "not a number", "date": "2024-03-02"},
                    {"amount": 4, "date": "garbage"},
                    {"amount": 4, "date": "2024-03-02"}
                ]
            }"#,
        );
        let expenses = store.expenses().unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses.iter().filter(|tx| tx.is_malformed()).count(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FileStore::open(Path::new("/no/such/snapshot.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn empty_object_is_a_valid_snapshot() {
        let store = store("{}");
        assert!(store.income().unwrap().is_empty());
        assert_eq!(store.totals().unwrap().total_income, Amount::ZERO);
    }
}
