//! Terminal front-end: command drivers and rendering
//!
//! Everything here is presentation. The aggregation itself lives in
//! `summary` and is handed one snapshot of the store plus an explicit
//! reference date.

pub mod plot;
pub mod table;

use std::fmt;
use std::path::Path;

use crate::store::{Store, StoreError};
use crate::summary::Dashboard;
use crate::util::{Date, Transaction};
use plot::Plotter;
use table::Table;

/// Error type for command execution
#[derive(Debug)]
pub enum CliError {
    Store(StoreError),
    Io(std::io::Error),
    /// Invalid command-line argument, with an explanation
    Arg(String),
    /// Credentials file problem
    Config(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Store(err) => write!(f, "{}", err),
            CliError::Io(err) => write!(f, "I/O error: {}", err),
            CliError::Arg(msg) => write!(f, "{}", msg),
            CliError::Config(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        CliError::Store(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

/// Fetch one snapshot of the store and render the dashboard
pub fn dashboard(
    store: &dyn Store,
    now: Date,
    expense_days: usize,
    income_days: usize,
    json: bool,
    svg_out: Option<&Path>,
) -> Result<(), CliError> {
    let income = store.income()?;
    let expenses = store.expenses()?;
    let totals = store.totals()?;
    let dash = Dashboard::assemble(&income, &expenses, &totals, now, expense_days, income_days);

    if json {
        let out = serde_json::to_string_pretty(&dash)
            .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        println!("{}", out);
    } else {
        let mut overview = Table::new("Financial Overview", "Total");
        overview.push_amount("Income".to_string(), dash.overview.total_income);
        overview.push_amount("Expense".to_string(), dash.overview.total_expense);
        overview.push_amount("Balance".to_string(), dash.overview.balance);
        println!("{}", overview);

        let title = format!("Last {} Days Income", income_days);
        let mut by_category = Table::new(&title, "Total");
        for bucket in &dash.income_by_category {
            by_category.push_amount(bucket.category.clone(), bucket.total);
        }
        println!("{}", by_category);

        let title = format!("Last {} Days Expenses", expense_days);
        let mut daily = Table::new(&title, "Total");
        for bucket in &dash.daily_expenses {
            daily.push_amount(bucket.date.label(), bucket.total);
        }
        println!("{}", daily);

        if !dash.recent_expenses.is_empty() {
            println!("Recent Expenses");
            listing(&dash.recent_expenses);
        }
        if !dash.recent_income.is_empty() {
            println!("Recent Income");
            listing(&dash.recent_income);
        }
    }

    if let Some(path) = svg_out {
        Plotter::from(&dash.daily_expenses).save_bar_chart(path)?;
        println!("chart written to {}", path.display());
    }
    Ok(())
}

/// Print one record per line, id last so the eye lands on the data first
pub fn listing(records: &[Transaction]) {
    for tx in records {
        let date = tx
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "----------".to_string());
        let amount = tx
            .amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string());
        let category = tx.category.as_deref().unwrap_or("");
        println!(
            "{}  {:>12}  {:<14}  {}  {}",
            date, amount, category, tx.description, tx.id
        );
    }
    if records.is_empty() {
        println!("(no records)");
    }
}

/// Write exported spreadsheet bytes where the user asked
pub fn save_export(bytes: &[u8], out: &Path) -> Result<(), CliError> {
    std::fs::write(out, bytes)?;
    println!("exported {} bytes to {}", bytes.len(), out.display());
    Ok(())
}
