use crate::api::{self, Mode};
use crate::budget::Budget;
use crate::commands::{check, Out};
use crate::home::HomeScreen;
use crate::model::Transaction;
use crate::{render, Config, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// What `budget today` reports.
#[derive(Debug, Clone, Serialize)]
pub struct TodayReport {
    pub date: NaiveDate,
    pub incomes: Vec<Transaction>,
    pub costs: Vec<Transaction>,
    pub budget: Budget,
}

/// Shows today's incomes and costs with the budget they add up to.
pub async fn today(config: Config, mode: Mode, today: NaiveDate) -> Result<Out<TodayReport>> {
    let mut api = api::api(&config, mode, today)?;
    let mut home = HomeScreen::new(api.as_mut(), today);
    home.load_today().await;
    check(&mut home)?;

    let state = home.into_state();
    let budget = state.budget();
    let mut all: Vec<Transaction> = state.incomes.iter().chain(&state.costs).cloned().collect();
    all.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

    let message = format!(
        "{}\n{}\n{}",
        render::summary(today, &budget),
        render::budget(&budget),
        render::transactions(today, &all),
    );
    Ok(Out::new(
        message,
        TodayReport {
            date: today,
            incomes: state.incomes,
            costs: state.costs,
            budget,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[tokio::test]
    async fn test_today_with_seed_data() {
        let env = TestEnv::new().await;
        let out = super::today(env.config(), Mode::Test, today())
            .await
            .unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.incomes.len(), 1);
        assert_eq!(report.costs.len(), 2);
        assert_eq!(report.budget.income, Decimal::from(1200));
        assert_eq!(report.budget.costs, Decimal::from_str("94.18").unwrap());
        assert_eq!(report.budget.value, Decimal::from_str("1105.82").unwrap());
        assert!(out
            .message()
            .contains("Budget: 0 + 1,200.00 - 94.18 = 1,105.82$"));
        assert!(out.message().starts_with("15 May"));
        assert!(out.message().contains("Salary"));
    }
}
