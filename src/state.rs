//! The state behind the home screen and the pure transitions between states.
//!
//! Nothing in this module performs I/O. Flows in `crate::home` fetch data and feed the results
//! back in as `Action`s.

use crate::aggregate::{split_by_type, totals_by_type};
use crate::budget::Budget;
use crate::model::{Period, Transaction, TransactionType};
use chrono::NaiveDate;
use serde::Serialize;

/// Progress of the "add transaction" flow.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddFlow {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        id: String,
    },
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    LoggedIn,
    /// The session ended. The caller must send the user to log in again.
    LoggedOut,
}

/// Visibility of the income and costs entry forms.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct Modals {
    pub income: bool,
    pub costs: bool,
}

impl Modals {
    fn set(&mut self, kind: TransactionType, visible: bool) {
        match kind {
            TransactionType::Income => self.income = visible,
            TransactionType::Costs => self.costs = visible,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct HomeState {
    /// Today's income transactions.
    pub incomes: Vec<Transaction>,
    /// Today's cost transactions.
    pub costs: Vec<Transaction>,
    /// Transactions of the selected period.
    pub monthly: Vec<Transaction>,
    pub period: Period,
    pub selected_day: u32,
    pub modals: Modals,
    pub loading: bool,
    pub add: AddFlow,
    /// Why the last submission failed, when it failed for a reason other than an expired session.
    pub add_error: Option<String>,
    pub auth: AuthState,
}

impl HomeState {
    /// The initial state: the period containing `today`, with today selected.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            incomes: Vec::new(),
            costs: Vec::new(),
            monthly: Vec::new(),
            period: Period::containing(today),
            selected_day: chrono::Datelike::day(&today),
            modals: Modals::default(),
            loading: false,
            add: AddFlow::Idle,
            add_error: None,
            auth: AuthState::LoggedIn,
        }
    }

    /// The running budget from today's transactions.
    pub fn budget(&self) -> Budget {
        Budget::from(totals_by_type(self.incomes.iter().chain(self.costs.iter())))
    }

    pub fn is_logged_out(&self) -> bool {
        self.auth == AuthState::LoggedOut
    }

    /// Whether `transaction` can be appended to the monthly set instead of refetching it.
    pub fn in_selected_period(&self, transaction: &Transaction) -> bool {
        self.period.contains(transaction.date)
    }

    /// The message of the last failed submission.
    pub fn add_error(&self) -> Option<&str> {
        self.add_error.as_deref()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Action {
    FetchStarted,
    FetchFinished,
    /// Today's list replaced wholesale.
    TodayLoaded(Vec<Transaction>),
    /// A month's list replaced wholesale. Dropped if `period` is no longer selected.
    MonthLoaded {
        period: Period,
        transactions: Vec<Transaction>,
    },
    PrevMonth,
    NextMonth,
    SelectDay(u32),
    OpenModal(TransactionType),
    CloseModal(TransactionType),
    SubmitStarted,
    /// The service accepted `transaction`. Appended to the monthly set when it falls in the
    /// selected period.
    SubmitSucceeded(Transaction),
    SubmitFailed(String),
    SessionExpired,
    LoggedOut,
}

/// Applies `action` to `state`.
pub fn reduce(mut state: HomeState, action: Action) -> HomeState {
    match action {
        Action::FetchStarted => state.loading = true,
        Action::FetchFinished => state.loading = false,
        Action::TodayLoaded(transactions) => {
            let (incomes, costs) = split_by_type(transactions);
            state.incomes = incomes;
            state.costs = costs;
        }
        Action::MonthLoaded {
            period,
            transactions,
        } => {
            if period == state.period {
                state.monthly = transactions;
            }
        }
        Action::PrevMonth => state.period = state.period.prev(),
        Action::NextMonth => state.period = state.period.next(),
        Action::SelectDay(day) => {
            if state.period.date(day).is_some() {
                state.selected_day = day;
            }
        }
        Action::OpenModal(kind) => state.modals.set(kind, true),
        Action::CloseModal(kind) => state.modals.set(kind, false),
        Action::SubmitStarted => {
            state.add = AddFlow::Submitting;
            state.add_error = None;
            state.loading = true;
        }
        Action::SubmitSucceeded(transaction) => {
            state.modals.set(transaction.kind, false);
            state.add = AddFlow::Succeeded {
                id: transaction.id.clone(),
            };
            if state.in_selected_period(&transaction) {
                state.monthly.push(transaction);
            }
        }
        Action::SubmitFailed(message) => {
            state.add = AddFlow::Idle;
            state.add_error = Some(message);
            state.loading = false;
        }
        Action::SessionExpired => {
            state.auth = AuthState::LoggedOut;
            state.add = AddFlow::Idle;
            state.loading = false;
        }
        Action::LoggedOut => {
            state.auth = AuthState::LoggedOut;
            state.incomes.clear();
            state.costs.clear();
            state.monthly.clear();
        }
    }
    state
}
