//! REST-backed transaction store
//!
//! Blocking reqwest client (no async runtime required). Every request
//! carries the bearer token when one is configured; a 401 maps to
//! `StoreError::NotAuthenticated` so the CLI can point at `soldo login`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{audit, Store, StoreError};
use crate::config::Config;
use crate::util::{NewTransaction, StoreTotals, Transaction};

const INCOME: &str = "/income";
const EXPENSE: &str = "/expense";
const DASHBOARD: &str = "/dashboard";

/// Client for the finance backend's REST API
#[derive(Clone)]
pub struct HttpStore {
    http: reqwest::blocking::Client,
    api_base: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(api_base: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_base,
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base.clone(), config.token.clone())
    }

    fn request(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().map_err(|e| StoreError::Network(e.to_string()))?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(StoreError::NotAuthenticated);
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(StoreError::Http(status.as_u16(), body));
        }
        Ok(resp)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let url = format!("{}{}", self.api_base, path);
        log::debug!("GET {}", url);
        self.request(self.http.get(&url))?
            .json::<T>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), StoreError> {
        let url = format!("{}{}", self.api_base, path);
        log::debug!("POST {}", url);
        self.request(self.http.post(&url).json(body)).map(|_| ())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        let url = format!("{}{}", self.api_base, path);
        log::debug!("DELETE {}", url);
        self.request(self.http.delete(&url)).map(|_| ())
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let url = format!("{}{}", self.api_base, path);
        log::debug!("GET {}", url);
        self.request(self.http.get(&url))?
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| StoreError::Network(e.to_string()))
    }

    pub fn add_income(&self, tx: &NewTransaction) -> Result<(), StoreError> {
        self.post_json(INCOME, tx)
    }

    pub fn add_expense(&self, tx: &NewTransaction) -> Result<(), StoreError> {
        self.post_json(EXPENSE, tx)
    }

    pub fn remove_income(&self, id: &str) -> Result<(), StoreError> {
        self.delete(&format!("{}/{}", INCOME, id))
    }

    pub fn remove_expense(&self, id: &str) -> Result<(), StoreError> {
        self.delete(&format!("{}/{}", EXPENSE, id))
    }

    /// Raw spreadsheet bytes from the backend's export endpoint
    pub fn export_income(&self) -> Result<Vec<u8>, StoreError> {
        self.get_bytes(&format!("{}/export", INCOME))
    }

    pub fn export_expense(&self) -> Result<Vec<u8>, StoreError> {
        self.get_bytes(&format!("{}/export", EXPENSE))
    }
}

impl Store for HttpStore {
    fn income(&self) -> Result<Vec<Transaction>, StoreError> {
        let records: Vec<Transaction> = self.get_json(INCOME)?;
        audit(&records, "income");
        Ok(records)
    }

    fn expenses(&self) -> Result<Vec<Transaction>, StoreError> {
        let records: Vec<Transaction> = self.get_json(EXPENSE)?;
        audit(&records, "expense");
        Ok(records)
    }

    fn totals(&self) -> Result<StoreTotals, StoreError> {
        self.get_json(DASHBOARD)
    }
}
