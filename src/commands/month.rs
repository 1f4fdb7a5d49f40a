use crate::aggregate;
use crate::api::{self, Mode};
use crate::args::MonthArgs;
use crate::budget::Budget;
use crate::commands::{check, Out};
use crate::home::HomeScreen;
use crate::model::Period;
use crate::state::HomeState;
use crate::{render, Config, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// What `budget month` reports.
#[derive(Debug, Clone, Serialize)]
pub struct MonthReport {
    pub period: Period,
    /// The net sum of every day that has transactions.
    pub days: BTreeMap<u32, Decimal>,
    pub budget: Budget,
}

/// Shows the calendar of a month, the current one unless `args` names another, followed by
/// today's budget.
pub async fn month(
    config: Config,
    mode: Mode,
    today: NaiveDate,
    args: MonthArgs,
) -> Result<Out<MonthReport>> {
    let period = period(&args, today)?;
    let mut api = api::api(&config, mode, today)?;
    let mut state = HomeState::new(today);
    state.period = period;
    let mut home = HomeScreen::resume(api.as_mut(), today, state);
    home.load().await;
    check(&mut home)?;

    let calendar = home.calendar();
    let state = home.into_state();
    let budget = state.budget();
    let message = format!(
        "{}\n{}",
        render::calendar(&calendar),
        render::budget(&budget)
    );
    Ok(Out::new(
        message,
        MonthReport {
            period,
            days: aggregate::month_sums(&state.monthly, period),
            budget,
        },
    ))
}

/// `--month` is 1–12 on the command line.
fn period(args: &MonthArgs, today: NaiveDate) -> Result<Period> {
    let month0 = args.month().map(|m| m - 1).unwrap_or(today.month0());
    let year = args.year().unwrap_or(today.year());
    Period::new(month0, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_period_defaults_to_today() {
        let p = period(&MonthArgs::default(), today()).unwrap();
        assert_eq!(p, Period::new(4, 2024).unwrap());
        let p = period(&MonthArgs::new(Some(1), Some(2023)), today()).unwrap();
        assert_eq!(p, Period::new(0, 2023).unwrap());
    }

    #[tokio::test]
    async fn test_current_month() {
        let env = TestEnv::new().await;
        let out = month(env.config(), Mode::Test, today(), MonthArgs::default())
            .await
            .unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.period, Period::new(4, 2024).unwrap());
        // Seeded offsets 0, 1, 2, 3, 5, 8 and 12 days back.
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[&15], Decimal::new(110582, 2));
        assert!(report.days[&14] < Decimal::ZERO);
        assert!(out.message().contains("May 2024"));
        assert!(out.message().contains("[15]+"));
        assert!(out.message().contains("Budget: 0 + 1,200.00"));
    }

    #[tokio::test]
    async fn test_other_month() {
        let env = TestEnv::new().await;
        let out = month(
            env.config(),
            Mode::Test,
            today(),
            MonthArgs::new(Some(4), Some(2024)),
        )
        .await
        .unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.period.name(), "April");
        assert_eq!(report.days.len(), 3);
        assert!(out.message().contains("April 2024"));
    }
}
