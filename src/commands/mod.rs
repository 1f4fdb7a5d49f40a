//! Command handlers for the budget CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod browse;
mod day;
mod init;
mod login;
mod month;
mod today;

use crate::home::HomeScreen;
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use browse::browse;
pub use day::day;
pub use init::init;
pub use login::{login, logout};
pub use month::month;
pub use today::today;

/// Printed when the service says the session is over.
const RELOGIN_MESSAGE: &str = "Your session has expired, run 'budget login'";

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// The flows of `HomeScreen` swallow their failures. A one-shot command surfaces them instead.
fn check(home: &mut HomeScreen<'_>) -> Result<()> {
    if home.state().is_logged_out() {
        bail!(RELOGIN_MESSAGE);
    }
    if let Some(message) = home.take_error() {
        bail!(message);
    }
    Ok(())
}
