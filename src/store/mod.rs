//! Transaction store boundary
//!
//! The dashboard consumes three read paths (income records, expense
//! records, pre-aggregated lifetime totals) behind the `Store` trait.
//! `HttpStore` talks to the REST backend; `FileStore` reads a local JSON
//! snapshot for offline use and tests.

pub mod file;
pub mod http;

use std::fmt;

pub use file::FileStore;
pub use http::HttpStore;

use crate::util::{StoreTotals, Transaction};

/// Read access to one user's transaction history
pub trait Store {
    fn income(&self) -> Result<Vec<Transaction>, StoreError>;
    fn expenses(&self) -> Result<Vec<Transaction>, StoreError>;
    fn totals(&self) -> Result<StoreTotals, StoreError>;
}

/// Error type for store operations
#[derive(Debug)]
pub enum StoreError {
    /// No token configured, or the backend rejected it
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// Malformed response body
    Parse(String),
    /// Local file I/O error
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotAuthenticated => {
                write!(f, "Not authenticated — run `soldo login` first")
            }
            StoreError::Network(msg) => write!(f, "Network error: {}", msg),
            StoreError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            StoreError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Count and report records the aggregation will treat as zero-contribution
pub(crate) fn audit(records: &[Transaction], kind: &str) {
    let malformed = records.iter().filter(|tx| tx.is_malformed()).count();
    if malformed > 0 {
        log::warn!(
            "{} of {} {} records have an unusable amount or date; they will not contribute",
            malformed,
            records.len(),
            kind
        );
    }
    log::debug!("fetched {} {} records", records.len(), kind);
}
