//! Sums over lists of transactions: per day, per type, and per day of a month.

use crate::model::{Period, Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Income and cost totals of a list of transactions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub costs: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.income - self.costs
    }
}

/// Folds `transactions` into income and cost totals.
pub fn totals_by_type<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Totals {
    transactions
        .into_iter()
        .fold(Totals::default(), |mut totals, t| {
            match t.kind {
                TransactionType::Income => totals.income += t.amount.value(),
                TransactionType::Costs => totals.costs += t.amount.value(),
            }
            totals
        })
}

/// The transactions that fall on `date`.
pub fn on_day(transactions: &[Transaction], date: NaiveDate) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date == date)
        .cloned()
        .collect()
}

/// Income minus costs for the transactions on `date`. Zero when nothing matches.
pub fn daily_sum_on(transactions: &[Transaction], date: NaiveDate) -> Decimal {
    totals_by_type(transactions.iter().filter(|t| t.date == date)).net()
}

/// Income minus costs for the transactions on the given day. `month` is the calendar month
/// number, 1–12. A date that does not exist sums to zero.
pub fn daily_sum(transactions: &[Transaction], year: i32, month: u32, day: u32) -> Decimal {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => daily_sum_on(transactions, date),
        None => Decimal::ZERO,
    }
}

/// Net sum per day of `period`. Only days that have transactions are present.
pub fn month_sums(transactions: &[Transaction], period: Period) -> BTreeMap<u32, Decimal> {
    let mut sums = BTreeMap::new();
    for t in transactions.iter().filter(|t| period.contains(t.date)) {
        let day = chrono::Datelike::day(&t.date);
        let entry = sums.entry(day).or_insert(Decimal::ZERO);
        match t.kind {
            TransactionType::Income => *entry += t.amount.value(),
            TransactionType::Costs => *entry -= t.amount.value(),
        }
    }
    sums
}

/// Splits a list into its income and cost transactions, keeping order.
pub fn split_by_type(transactions: Vec<Transaction>) -> (Vec<Transaction>, Vec<Transaction>) {
    transactions.into_iter().partition(Transaction::is_income)
}
