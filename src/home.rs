//! The flows of the home screen: loading today's and the selected month's transactions, moving
//! between months, adding a transaction, and logging out.
//!
//! Each flow talks to the `Api`, then feeds the outcome to `state::reduce`. Failures never escape a
//! flow: an expired session marks the state as logged out, anything else is logged and leaves the
//! last-known data in place.

use crate::api::Api;
use crate::calendar::{select_day, CalendarMonth, DaySelection};
use crate::error::ErrorKind;
use crate::model::{Amount, NewTransaction, TransactionType};
use crate::state::{reduce, Action, AddFlow, HomeState};
use crate::{utils, Error};
use chrono::NaiveDate;
use tracing::{debug, error, info};

/// Shown when logging out fails without a message of its own.
pub const LOGOUT_FALLBACK_MESSAGE: &str = "Unable to log out of the account.";

/// Drives a `HomeState` through the remote service.
pub struct HomeScreen<'a> {
    api: &'a mut dyn Api,
    state: HomeState,
    today: NaiveDate,
    last_error: Option<String>,
}

impl<'a> HomeScreen<'a> {
    pub fn new(api: &'a mut dyn Api, today: NaiveDate) -> Self {
        Self::resume(api, today, HomeState::new(today))
    }

    /// Continues with a state left behind by an earlier screen.
    pub fn resume(api: &'a mut dyn Api, today: NaiveDate, state: HomeState) -> Self {
        Self {
            api,
            state,
            today,
            last_error: None,
        }
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    pub fn into_state(self) -> HomeState {
        self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::replace(&mut self.state, HomeState::new(self.today));
        self.state = reduce(state, action);
    }

    /// Loads today's and the selected month's transactions.
    pub async fn load(&mut self) {
        self.load_today().await;
        self.load_month().await;
    }

    pub async fn load_today(&mut self) {
        self.dispatch(Action::FetchStarted);
        match self.api.fetch_transactions_today().await {
            Ok(transactions) => {
                debug!("Loaded {} transactions for today", transactions.len());
                self.dispatch(Action::TodayLoaded(transactions));
            }
            Err(e) => self.handle_error(e, "Failed to load transactions"),
        }
        self.dispatch(Action::FetchFinished);
    }

    pub async fn load_month(&mut self) {
        let period = self.state.period;
        self.dispatch(Action::FetchStarted);
        match self.api.fetch_transactions_for_month(period).await {
            Ok(transactions) => {
                debug!("Loaded {} transactions for {period}", transactions.len());
                self.dispatch(Action::MonthLoaded {
                    period,
                    transactions,
                });
            }
            Err(e) => self.handle_error(e, "Failed to load monthly transactions"),
        }
        self.dispatch(Action::FetchFinished);
    }

    pub async fn prev_month(&mut self) {
        self.dispatch(Action::PrevMonth);
        self.load_month().await;
    }

    pub async fn next_month(&mut self) {
        self.dispatch(Action::NextMonth);
        self.load_month().await;
    }

    pub fn open_modal(&mut self, kind: TransactionType) {
        self.dispatch(Action::OpenModal(kind));
    }

    pub fn close_modal(&mut self, kind: TransactionType) {
        self.dispatch(Action::CloseModal(kind));
    }

    /// Selects `day` of the current period and returns what it leads to.
    pub fn select(&mut self, day: u32) -> Option<DaySelection> {
        self.dispatch(Action::SelectDay(day));
        select_day(self.state.period, day, self.today, &self.state.monthly)
    }

    pub fn calendar(&self) -> CalendarMonth {
        CalendarMonth::build(self.state.period, &self.state.monthly, self.today)
    }

    /// Creates a transaction dated today. On success today's list is refetched. The new
    /// transaction is appended to the monthly list when today lies in the selected month;
    /// otherwise the selected month is refetched.
    pub async fn add_transaction(
        &mut self,
        kind: TransactionType,
        amount: Amount,
        category: impl Into<String>,
    ) {
        let new = NewTransaction {
            amount,
            category: category.into(),
            kind,
            date: self.today,
        };
        self.dispatch(Action::SubmitStarted);

        let created = match self.api.create_transaction(&new).await {
            Ok(created) => created,
            Err(e) => {
                match ErrorKind::of(&e) {
                    ErrorKind::SessionExpired => self.dispatch(Action::SessionExpired),
                    ErrorKind::Other => {
                        error!("Add transaction error: {e:#}");
                        self.dispatch(Action::SubmitFailed(e.to_string()));
                    }
                }
                return;
            }
        };

        let id = created.id.unwrap_or_else(utils::local_transaction_id);
        info!("Added {} of {} as {id}", new.kind, new.amount);
        let transaction = new.into_transaction(id);
        let in_period = self.state.in_selected_period(&transaction);

        self.load_today().await;
        if self.state.is_logged_out() {
            return;
        }
        self.dispatch(Action::SubmitSucceeded(transaction));
        if !in_period {
            self.load_month().await;
        }
    }

    /// Ends the session with the service. Returns the message to alert the user with on failure.
    pub async fn logout(&mut self) -> Result<(), String> {
        match self.api.logout().await {
            Ok(()) => {
                self.dispatch(Action::LoggedOut);
                Ok(())
            }
            Err(e) => {
                error!("Logout error: {e:#}");
                Err(logout_alert(&e))
            }
        }
    }

    /// Whether the last submission succeeded.
    pub fn added(&self) -> Option<&str> {
        match &self.state.add {
            AddFlow::Succeeded { id } => Some(id),
            _ => None,
        }
    }

    /// The last failure that was neither an expired session nor a failed submission, if any.
    /// Taking it clears it.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    fn handle_error(&mut self, e: Error, what: &str) {
        match ErrorKind::of(&e) {
            ErrorKind::SessionExpired => {
                debug!("{what}: session expired");
                self.dispatch(Action::SessionExpired);
            }
            ErrorKind::Other => {
                error!("{what}: {e:#}");
                self.last_error = Some(format!("{what}: {e}"));
            }
        }
    }
}

/// The error's own message, or the fallback when it has none.
fn logout_alert(e: &Error) -> String {
    let message = e.to_string();
    if message.trim().is_empty() {
        LOGOUT_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestApi;
    use crate::model::Period;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn seed(api: &mut TestApi, amount_str: &str, kind: TransactionType, date: NaiveDate) {
        api.insert(NewTransaction {
            amount: amount(amount_str),
            category: String::from("Seed"),
            kind,
            date,
        });
    }

    #[tokio::test]
    async fn test_load() {
        let mut api = TestApi::new(today());
        seed(&mut api, "100", TransactionType::Income, today());
        seed(&mut api, "40", TransactionType::Costs, today());
        seed(&mut api, "5", TransactionType::Costs, today().pred_opt().unwrap());
        let mut home = HomeScreen::new(&mut api, today());
        home.load().await;

        let state = home.state();
        assert!(!state.loading);
        assert_eq!(state.incomes.len(), 1);
        assert_eq!(state.costs.len(), 1);
        assert_eq!(state.monthly.len(), 3);
        assert_eq!(state.budget().value, Decimal::from(60));
        let calendar = home.calendar();
        assert_eq!(calendar.day(15).unwrap().sum, Decimal::from(60));
        assert_eq!(calendar.day(14).unwrap().sum, Decimal::from(-5));
    }

    #[tokio::test]
    async fn test_navigation_refetches() {
        let mut api = TestApi::new(today());
        seed(
            &mut api,
            "7",
            TransactionType::Costs,
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        );
        {
            let mut home = HomeScreen::new(&mut api, today());
            home.load_month().await;
            assert!(home.state().monthly.is_empty());
            home.prev_month().await;
            assert_eq!(home.state().period, Period::new(3, 2024).unwrap());
            assert_eq!(home.state().monthly.len(), 1);
            home.next_month().await;
            assert!(home.state().monthly.is_empty());
        }
        assert_eq!(api.calls().month, 3);
    }

    #[tokio::test]
    async fn test_add_in_selected_month_appends_without_refetch() {
        let mut api = TestApi::new(today());
        {
            let mut home = HomeScreen::new(&mut api, today());
            home.load().await;
            home.open_modal(TransactionType::Income);
            home.add_transaction(TransactionType::Income, amount("25"), "Gift")
                .await;
            let state = home.state();
            assert!(home.added().is_some());
            assert!(!state.modals.income);
            assert!(!state.loading);
            assert_eq!(state.incomes.len(), 1);
            assert_eq!(state.monthly.len(), 1);
            assert_eq!(state.monthly[0].name, "Gift");
            assert_eq!(state.monthly[0].date, today());
        }
        let calls = api.calls();
        assert_eq!(calls.create, 1);
        assert_eq!(calls.today, 2);
        assert_eq!(calls.month, 1);
    }

    #[tokio::test]
    async fn test_add_outside_selected_month_refetches() {
        let mut api = TestApi::new(today());
        {
            let mut home = HomeScreen::new(&mut api, today());
            home.load().await;
            home.prev_month().await;
            home.add_transaction(TransactionType::Costs, amount("3"), "Tea")
                .await;
            let state = home.state();
            // Still on April, which the new transaction does not belong to.
            assert_eq!(state.period, Period::new(3, 2024).unwrap());
            assert!(state.monthly.is_empty());
            assert_eq!(state.costs.len(), 1);
        }
        // load, prev_month, and the refetch after adding.
        assert_eq!(api.calls().month, 3);
    }

    #[tokio::test]
    async fn test_add_with_expired_session() {
        let mut api = TestApi::new(today());
        api.expire_session();
        let mut home = HomeScreen::new(&mut api, today());
        home.add_transaction(TransactionType::Costs, amount("3"), "Tea")
            .await;
        assert!(home.state().is_logged_out());
        assert_eq!(home.state().add, AddFlow::Idle);
    }

    #[tokio::test]
    async fn test_add_failure_keeps_state() {
        let mut api = TestApi::new(today());
        seed(&mut api, "10", TransactionType::Income, today());
        let mut home = HomeScreen::new(&mut api, today());
        home.load().await;
        let state = home.into_state();
        api.fail_with("server exploded");
        let mut home = HomeScreen::resume(&mut api, today(), state);
        home.add_transaction(TransactionType::Costs, amount("3"), "Tea")
            .await;
        let state = home.state();
        assert!(!state.is_logged_out());
        assert!(state.add_error().unwrap().contains("server exploded"));
        assert_eq!(state.monthly.len(), 1);
        assert_eq!(state.incomes.len(), 1);
    }

    #[tokio::test]
    async fn test_add_with_failed_refresh_reports_error() {
        let mut api = TestApi::new(today());
        let mut home = HomeScreen::new(&mut api, today());
        home.load().await;
        let state = home.into_state();
        api.fail_fetches_with("refresh failed");
        {
            let mut home = HomeScreen::resume(&mut api, today(), state);
            home.add_transaction(TransactionType::Costs, amount("3"), "Tea")
                .await;
            assert!(home.added().is_some());
            assert!(home.state().add_error().is_none());
            assert!(home.take_error().unwrap().contains("refresh failed"));
        }
        assert_eq!(api.calls().create, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_last_known_state() {
        let mut api = TestApi::new(today());
        seed(&mut api, "10", TransactionType::Income, today());
        let mut home = HomeScreen::new(&mut api, today());
        home.load().await;
        let state = home.into_state();
        api.fail_with("offline");
        let mut home = HomeScreen::resume(&mut api, today(), state);
        home.load().await;
        let state = home.state();
        assert_eq!(state.incomes.len(), 1);
        assert_eq!(state.monthly.len(), 1);
        assert!(!state.is_logged_out());
        assert!(!state.loading);
        assert!(home.take_error().unwrap().contains("offline"));
        assert!(home.take_error().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_on_load() {
        let mut api = TestApi::new(today());
        api.expire_session();
        let mut home = HomeScreen::new(&mut api, today());
        home.load().await;
        assert!(home.state().is_logged_out());
    }

    #[tokio::test]
    async fn test_select_day() {
        let mut api = TestApi::new(today());
        seed(
            &mut api,
            "10",
            TransactionType::Income,
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        );
        let mut home = HomeScreen::new(&mut api, today());
        home.load_month().await;
        assert_eq!(home.select(15), Some(DaySelection::Today));
        match home.select(3) {
            Some(DaySelection::Day { transactions, .. }) => assert_eq!(transactions.len(), 1),
            other => panic!("unexpected selection {other:?}"),
        }
        assert_eq!(home.state().selected_day, 3);
    }

    #[tokio::test]
    async fn test_logout() {
        let mut api = TestApi::new(today());
        let mut home = HomeScreen::new(&mut api, today());
        assert!(home.logout().await.is_ok());
        assert!(home.state().is_logged_out());
    }

    #[tokio::test]
    async fn test_logout_failure_alert() {
        let mut api = TestApi::new(today());
        api.fail_with("nope");
        let mut home = HomeScreen::new(&mut api, today());
        let alert = home.logout().await.unwrap_err();
        assert!(alert.contains("nope"));
        assert!(!home.state().is_logged_out());
    }

    #[test]
    fn test_logout_alert_fallback() {
        let e = anyhow::anyhow!("");
        assert_eq!(logout_alert(&e), LOGOUT_FALLBACK_MESSAGE);
    }
}
