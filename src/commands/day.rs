use crate::api::{self, Mode};
use crate::calendar::DaySelection;
use crate::commands::{check, Out};
use crate::home::HomeScreen;
use crate::model::{Period, Transaction};
use crate::state::HomeState;
use crate::{render, Config, Result};
use anyhow::bail;
use chrono::{Datelike, NaiveDate};

/// Shows the transactions of `date`. For today, the daily summary is shown as well, the way
/// selecting today on the calendar leads back to the home view.
pub async fn day(
    config: Config,
    mode: Mode,
    today: NaiveDate,
    date: NaiveDate,
) -> Result<Out<Vec<Transaction>>> {
    let mut api = api::api(&config, mode, today)?;
    let mut state = HomeState::new(today);
    state.period = Period::containing(date);
    let mut home = HomeScreen::resume(api.as_mut(), today, state);
    home.load_month().await;
    check(&mut home)?;

    match home.select(date.day()) {
        Some(DaySelection::Today) => {
            home.load_today().await;
            check(&mut home)?;
            let state = home.into_state();
            let budget = state.budget();
            let all: Vec<Transaction> = state.incomes.into_iter().chain(state.costs).collect();
            let message = format!(
                "{}\n{}",
                render::summary(today, &budget),
                render::transactions(date, &all)
            );
            Ok(Out::new(message, all))
        }
        Some(DaySelection::Day { transactions, .. }) => Ok(Out::new(
            render::transactions(date, &transactions),
            transactions,
        )),
        None => bail!("{date} is not a day of {}", Period::containing(date)),
    }
}
