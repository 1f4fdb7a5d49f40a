//! Implements the `Api` trait in memory for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a budgeting server.

use crate::api::response::{self, NameFallback};
use crate::api::{Api, Created};
use crate::error::{ApiError, SESSION_EXPIRED_MESSAGE};
use crate::model::{Amount, NewTransaction, Period, Transaction, TransactionType};
use crate::Result;
use anyhow::{bail, Context};
use chrono::{Days, NaiveDate};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::io::Cursor;
use std::str::FromStr;

/// How many times each operation was called.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Calls {
    pub today: usize,
    pub month: usize,
    pub create: usize,
    pub login: usize,
    pub logout: usize,
}

/// An in-memory budgeting service. Records are handed out as raw JSON and go through the same
/// normalization as responses from the real service.
pub struct TestApi {
    today: NaiveDate,
    records: Vec<Value>,
    next_id: u64,
    calls: Calls,
    session_expired: bool,
    failure: Option<String>,
    fetch_failure: Option<String>,
}

impl TestApi {
    /// An empty service whose current day is `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            records: Vec::new(),
            next_id: 1,
            calls: Calls::default(),
            session_expired: false,
            failure: None,
            fetch_failure: None,
        }
    }

    /// A service seeded with the sample data of this module, dated relative to `today`.
    pub fn seeded(today: NaiveDate) -> Result<Self> {
        let mut api = Self::new(today);
        for row in load_csv(SEED_DATA)? {
            let [days_ago, category, amount, kind] = row.as_slice() else {
                bail!("A seed row must have 4 fields, got {row:?}");
            };
            let days_ago = u64::from_str(days_ago)
                .with_context(|| format!("Invalid seed offset '{days_ago}'"))?;
            let date = today
                .checked_sub_days(Days::new(days_ago))
                .context("Seed date out of range")?;
            let amount = Amount::from_str(amount)
                .map_err(|e| anyhow::anyhow!("Invalid seed amount '{amount}': {e}"))?;
            let kind = TransactionType::from_str(kind)?;
            api.insert(NewTransaction {
                amount,
                category: category.to_string(),
                kind,
                date,
            });
        }
        Ok(api)
    }

    /// Stores a transaction as the service would and returns its id.
    pub fn insert(&mut self, transaction: NewTransaction) -> String {
        let id = format!("test{:06}", self.next_id);
        self.next_id += 1;
        self.records.push(json!({
            "_id": id,
            "category": transaction.category,
            "amount": transaction.amount.to_f64(),
            "type": transaction.kind,
            "date": format!("{}T12:00:00.000Z", transaction.date.format("%Y-%m-%d")),
        }));
        id
    }

    /// Makes every following call fail as if the session expired.
    pub fn expire_session(&mut self) {
        self.session_expired = true;
    }

    /// Makes every following call fail with `message`.
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    /// Makes the following fetches fail with `message`. Other calls still succeed.
    pub fn fail_fetches_with(&mut self, message: impl Into<String>) {
        self.fetch_failure = Some(message.into());
    }

    pub fn recover(&mut self) {
        self.session_expired = false;
        self.failure = None;
        self.fetch_failure = None;
    }

    pub fn calls(&self) -> Calls {
        self.calls
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn check(&self) -> Result<()> {
        if self.session_expired {
            return Err(ApiError::from_status(
                StatusCode::FORBIDDEN,
                Some(SESSION_EXPIRED_MESSAGE.to_string()),
            )
            .into());
        }
        if let Some(message) = &self.failure {
            return Err(ApiError::from_status(
                StatusCode::SERVICE_UNAVAILABLE,
                Some(message.clone()),
            )
            .into());
        }
        Ok(())
    }

    fn check_fetch(&self) -> Result<()> {
        self.check()?;
        if let Some(message) = &self.fetch_failure {
            return Err(ApiError::from_status(
                StatusCode::SERVICE_UNAVAILABLE,
                Some(message.clone()),
            )
            .into());
        }
        Ok(())
    }

    fn records_where(&self, keep: impl Fn(NaiveDate) -> bool) -> Value {
        let data: Vec<Value> = self
            .records
            .iter()
            .filter(|r| {
                r.get("date")
                    .and_then(Value::as_str)
                    .and_then(response::parse_date)
                    .is_some_and(&keep)
            })
            .cloned()
            .collect();
        json!({ "data": data })
    }
}

#[async_trait::async_trait]
impl Api for TestApi {
    async fn fetch_transactions_today(&mut self) -> Result<Vec<Transaction>> {
        self.calls.today += 1;
        self.check_fetch()?;
        let today = self.today;
        let body = self.records_where(|date| date == today);
        Ok(response::transactions(body, NameFallback::ByType)?)
    }

    async fn fetch_transactions_for_month(&mut self, period: Period) -> Result<Vec<Transaction>> {
        self.calls.month += 1;
        self.check_fetch()?;
        let body = self.records_where(|date| period.contains(date));
        Ok(response::transactions(body, NameFallback::Unknown)?)
    }

    async fn create_transaction(&mut self, transaction: &NewTransaction) -> Result<Created> {
        self.calls.create += 1;
        self.check()?;
        let id = self.insert(transaction.clone());
        Ok(Created { id: Some(id) })
    }

    async fn login(&mut self, email: &str, _password: &str) -> Result<String> {
        self.calls.login += 1;
        self.session_expired = false;
        Ok(format!("test-token-{email}"))
    }

    async fn logout(&mut self) -> Result<()> {
        self.calls.logout += 1;
        self.check()
    }
}

/// Loads rows from a CSV-formatted string that has a header row.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to read seed data")?;
        rows.push(record.iter().map(String::from).collect());
    }
    Ok(rows)
}

/// Seed transactions. `days_ago` is counted back from the service's current day.
const SEED_DATA: &str = r##"days_ago,category,amount,type
0,Salary,1200.00,income
0,Groceries,87.43,costs
0,Coffee,6.75,costs
1,Restaurants,42.30,costs
2,Freelance,350.00,income
3,Gas & Fuel,52.30,costs
5,Utilities,142.67,costs
8,Groceries,63.21,costs
12,Gift,100.00,income
20,Internet,89.99,costs
35,Salary,1200.00,income
40,Rent,900.00,costs
"##;
