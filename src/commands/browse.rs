//! The interactive home screen. Reads one command per line:
//!
//! - `n` / `p` move to the next or previous month
//! - `d <day>` shows a day of the selected month
//! - `+ <amount> [category]` / `- <amount> [category]` add an income or a cost for today
//! - `t` shows today's summary
//! - `q` quits

use crate::api::{self, Mode};
use crate::calendar::DaySelection;
use crate::commands::{Out, RELOGIN_MESSAGE};
use crate::home::HomeScreen;
use crate::model::{Amount, TransactionType};
use crate::{render, Config, Result};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

const HELP: &str = "n: next month, p: previous month, d <day>: show a day, \
+ <amount> [category]: add income, - <amount> [category]: add costs, t: today, q: quit";

/// Runs the interactive loop on stdin until `q` or end of input.
pub async fn browse(config: Config, mode: Mode, today: NaiveDate) -> Result<Out<()>> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    browse_with(config, mode, today, &mut stdin).await
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Prev,
    Day(u32),
    Add(TransactionType, Amount, String),
    Today,
    Quit,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "n" => Ok(Input::Next),
            "p" => Ok(Input::Prev),
            "t" => Ok(Input::Today),
            "q" => Ok(Input::Quit),
            "d" => rest
                .parse()
                .map(Input::Day)
                .map_err(|_| format!("Not a day: '{rest}'")),
            "+" | "-" => {
                let kind = if head == "+" {
                    TransactionType::Income
                } else {
                    TransactionType::Costs
                };
                let (amount, category) = match rest.split_once(char::is_whitespace) {
                    Some((amount, category)) => (amount, category.trim()),
                    None => (rest, ""),
                };
                let amount = Amount::from_str(amount)
                    .map_err(|e| format!("Not an amount: '{amount}': {e}"))?;
                Ok(Input::Add(kind, amount, category.to_string()))
            }
            _ => Err(format!("Unknown command '{line}'. {HELP}")),
        }
    }
}

async fn browse_with<R>(
    config: Config,
    mode: Mode,
    today: NaiveDate,
    input: &mut R,
) -> Result<Out<()>>
where
    R: AsyncBufRead + Unpin,
{
    let mut api = api::api(&config, mode, today)?;
    let mut home = HomeScreen::new(api.as_mut(), today);
    home.load().await;
    show_home(&mut home)?;
    info!("{HELP}");

    let mut line = String::new();
    loop {
        line.clear();
        let read = input
            .read_line(&mut line)
            .await
            .context("Unable to read from stdin")?;
        if read == 0 {
            debug!("End of input");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let command = match Input::from_str(&line) {
            Ok(command) => command,
            Err(message) => {
                warn!("{message}");
                continue;
            }
        };
        match command {
            Input::Quit => break,
            Input::Next => {
                home.next_month().await;
                show_home(&mut home)?;
            }
            Input::Prev => {
                home.prev_month().await;
                show_home(&mut home)?;
            }
            Input::Today => {
                home.load_today().await;
                ensure_logged_in(&mut home)?;
                let budget = home.state().budget();
                info!("{}", render::summary(today, &budget));
            }
            Input::Day(day) => match home.select(day) {
                Some(DaySelection::Today) => {
                    let budget = home.state().budget();
                    info!("{}", render::summary(today, &budget));
                }
                Some(DaySelection::Day { date, transactions }) => {
                    info!("{}", render::transactions(date, &transactions));
                }
                None => warn!("{} has no day {day}", home.state().period),
            },
            Input::Add(kind, amount, category) => {
                home.open_modal(kind);
                home.add_transaction(kind, amount, category).await;
                ensure_logged_in(&mut home)?;
                if let Some(message) = home.state().add_error() {
                    warn!("Unable to add the transaction: {message}");
                    home.close_modal(kind);
                } else {
                    show_home(&mut home)?;
                }
            }
        }
    }
    Ok("Bye".into())
}

/// Prints the calendar of the selected month and the budget line.
fn show_home(home: &mut HomeScreen<'_>) -> Result<()> {
    ensure_logged_in(home)?;
    let budget = home.state().budget();
    info!(
        "{}\n{}",
        render::calendar(&home.calendar()),
        render::budget(&budget)
    );
    Ok(())
}

/// An expired session ends the loop. Other failures are shown and the loop goes on.
fn ensure_logged_in(home: &mut HomeScreen<'_>) -> Result<()> {
    if home.state().is_logged_out() {
        bail!(RELOGIN_MESSAGE);
    }
    if let Some(message) = home.take_error() {
        warn!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(Input::from_str("n\n").unwrap(), Input::Next);
        assert_eq!(Input::from_str(" p ").unwrap(), Input::Prev);
        assert_eq!(Input::from_str("d 3").unwrap(), Input::Day(3));
        assert_eq!(
            Input::from_str("- 4.50 Coffee beans").unwrap(),
            Input::Add(
                TransactionType::Costs,
                Amount::from_str("4.50").unwrap(),
                String::from("Coffee beans")
            )
        );
        assert_eq!(
            Input::from_str("+ 10").unwrap(),
            Input::Add(
                TransactionType::Income,
                Amount::from_str("10").unwrap(),
                String::new()
            )
        );
        assert!(Input::from_str("d x").is_err());
        assert!(Input::from_str("+ abc").is_err());
        assert!(Input::from_str("+ $-5").is_err());
        assert!(Input::from_str("x").is_err());
    }

    #[tokio::test]
    async fn test_browse_session() {
        let env = TestEnv::new().await;
        let mut input: &[u8] = b"p\nn\nd 14\nbogus\n- 5 Tea\nt\nq\nn\n";
        let out = browse_with(env.config(), Mode::Test, today(), &mut input)
            .await
            .unwrap();
        assert_eq!(out.message(), "Bye");
    }

    #[tokio::test]
    async fn test_browse_end_of_input() {
        let env = TestEnv::new().await;
        let mut input: &[u8] = b"n\n";
        let out = browse_with(env.config(), Mode::Test, today(), &mut input)
            .await
            .unwrap();
        assert_eq!(out.message(), "Bye");
    }
}
