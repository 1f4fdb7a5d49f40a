//! The remote budgeting service, seen through the `Api` trait.
//!
//! `HttpApi` talks to the real service with `reqwest`. `TestApi` keeps everything in memory so the
//! whole program can be run, and tested, without a server.

mod http;
pub mod response;
mod test_api;

use crate::model::{NewTransaction, Period, Transaction};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub(crate) use http::HttpApi;
pub use test_api::TestApi;

/// When this environment variable is set and non-empty, commands use `TestApi`.
pub const TEST_MODE_ENV: &str = "BUDGET_IN_TEST_MODE";

/// The answer of the service to a created transaction.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Created {
    /// The id assigned by the service, if it sent one back.
    pub id: Option<String>,
}

/// The operations of the remote transaction service the client depends on.
///
/// Every method fails with an `ApiError::SessionExpired` somewhere in the error chain when the
/// session is no longer valid.
#[async_trait::async_trait]
pub trait Api: Send {
    /// The transactions of the current day, as the service sees it.
    async fn fetch_transactions_today(&mut self) -> Result<Vec<Transaction>>;

    /// The transactions of `period`.
    async fn fetch_transactions_for_month(&mut self, period: Period) -> Result<Vec<Transaction>>;

    async fn create_transaction(&mut self, transaction: &NewTransaction) -> Result<Created>;

    /// Starts a session and returns its token.
    async fn login(&mut self, email: &str, password: &str) -> Result<String>;

    async fn logout(&mut self) -> Result<()>;
}

/// Which `Api` implementation to use.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Remote,
    Test,
}

impl Mode {
    /// `Mode::Test` when `BUDGET_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Remote`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Remote,
        }
    }
}

/// Creates the `Api` for `mode`. `today` seeds the in-memory data in test mode.
pub(crate) fn api(config: &Config, mode: Mode, today: NaiveDate) -> Result<Box<dyn Api>> {
    Ok(match mode {
        Mode::Remote => Box::new(HttpApi::new(config.api_url(), config.session_token())?),
        Mode::Test => Box::new(TestApi::seeded(today)?),
    })
}
