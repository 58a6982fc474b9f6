//! Transaction records as the backend serves them
//!
//! Decoding is deliberately lenient: a record with an unusable amount or
//! date still decodes, with the offending field set to `None`, so that one
//! bad row never aborts a whole fetch. The aggregation engine treats such
//! records as zero-contribution.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::util::{amount::Amount, date::Date};

/// A single income or expense record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque backend identifier
    #[serde(alias = "_id", default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// `None` when the backend field is missing or not a usable number
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<Amount>,
    /// `None` when the backend field is missing or not a usable date
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Income records carry a source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Expense records carry a payment method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Transaction {
    /// A record the engine can do nothing with
    pub fn is_malformed(&self) -> bool {
        self.date.is_none() || self.amount.is_none()
    }
}

/// Payload for creating a record through the store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub description: String,
    pub amount: Amount,
    pub date: Date,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// Lifetime totals and recent activity, as served by the dashboard endpoint
///
/// The totals are computed by the store over its whole history; the engine
/// only subtracts them (see `summary::overview`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreTotals {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub recent_income: Vec<Transaction>,
    pub recent_expenses: Vec<Transaction>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64().and_then(Amount::from_f64),
        Some(Value::String(s)) => s.parse().ok(),
        Some(_) => None,
    };
    if parsed.is_none() {
        log::warn!("skipping unusable amount {:?}", raw);
    }
    Ok(parsed)
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.parse().ok(),
        Some(_) => None,
    };
    if parsed.is_none() {
        log::warn!("skipping unusable date {:?}", raw);
    }
    Ok(parsed)
}
