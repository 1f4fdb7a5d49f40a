//! These structs provide the CLI interface for the budget CLI.

use crate::model::{Amount, TransactionType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: A command-line client for your personal budget.
///
/// Shows a calendar of the month with each day's net sum, today's incomes and costs, and the
/// running budget. New incomes and costs are recorded with the budgeting service you log in to.
///
/// Start with `budget init --api-url <URL>` and `budget login`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    Init(InitArgs),
    /// Log in to the budgeting service and store the session.
    Login(LoginArgs),
    /// Log out of the budgeting service and remove the stored session.
    Logout(LogoutArgs),
    /// Show today's incomes, costs, and the running budget.
    Today,
    /// Show the calendar of a month with each day's net sum.
    Month(MonthArgs),
    /// Show the transactions of one day.
    Day(DayArgs),
    /// Record an income or a cost for today.
    Add(AddArgs),
    /// Browse months interactively and add transactions.
    Browse,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and the session are held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the budgeting service, e.g. https://budget.example.com/api
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Args for the `budget login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    /// The account password. Prefer passing it through BUDGET_PASSWORD.
    #[arg(long, env = "BUDGET_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Args for the `budget logout` command.
#[derive(Debug, Parser, Clone)]
pub struct LogoutArgs {
    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

impl LogoutArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `budget month` command. Defaults to the current month.
#[derive(Debug, Parser, Clone, Default)]
pub struct MonthArgs {
    /// The month, 1 through 12.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// The year, 1 through 9999.
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
    year: Option<i32>,
}

impl MonthArgs {
    pub fn new(month: Option<u32>, year: Option<i32>) -> Self {
        Self { month, year }
    }

    /// The month as given on the command line, 1–12.
    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// Args for the `budget day` command.
#[derive(Debug, Parser, Clone)]
pub struct DayArgs {
    /// The day to show, as YYYY-MM-DD.
    date: NaiveDate,
}

impl DayArgs {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Either "income" or "costs".
    kind: TransactionType,

    /// The amount, e.g. 12.50. Must not be negative.
    #[arg(long)]
    amount: Amount,

    #[arg(long, default_value = "")]
    category: String,
}

impl AddArgs {
    pub fn new(kind: TransactionType, amount: Amount, category: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
        }
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory.",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
