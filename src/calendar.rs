//! Calendar cells for a month: each day's net sum and the color it is displayed with.

use crate::aggregate::{month_sums, on_day};
use crate::model::{Period, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// The display state of a calendar day.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayColor {
    Positive,
    Negative,
    Neutral,
}

/// Maps a day's net sum to its display state.
pub fn day_color(sum: Decimal) -> DayColor {
    if sum > Decimal::ZERO {
        DayColor::Positive
    } else if sum < Decimal::ZERO {
        DayColor::Negative
    } else {
        DayColor::Neutral
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub sum: Decimal,
    pub color: DayColor,
    pub is_today: bool,
}

/// A grid cell. Padding cells fill the first and last week of the month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Padding,
    Day(DayCell),
}

/// A month laid out in weeks of seven cells, Sunday first.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub period: Period,
    pub weeks: Vec<Vec<Cell>>,
}

impl CalendarMonth {
    pub fn build(period: Period, transactions: &[Transaction], today: NaiveDate) -> Self {
        let sums = month_sums(transactions, period);
        let mut cells: Vec<Cell> = (0..period.first_weekday()).map(|_| Cell::Padding).collect();
        for day in 1..=period.days_in_month() {
            let sum = sums.get(&day).copied().unwrap_or(Decimal::ZERO);
            cells.push(Cell::Day(DayCell {
                day,
                sum,
                color: day_color(sum),
                is_today: period.date(day) == Some(today),
            }));
        }
        while cells.len() % 7 != 0 {
            cells.push(Cell::Padding);
        }
        let weeks = cells.chunks(7).map(|week| week.to_vec()).collect();
        Self { period, weeks }
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten().filter_map(|cell| match cell {
            Cell::Day(day) => Some(day),
            Cell::Padding => None,
        })
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days().find(|cell| cell.day == day)
    }
}

/// What selecting a calendar day leads to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DaySelection {
    /// Today's cell opens the daily entry summary.
    Today,
    /// Any other day shows that day's transactions from the monthly set.
    Day {
        date: NaiveDate,
        transactions: Vec<Transaction>,
    },
}

/// Resolves a click on `day` of `period`. Returns `None` when the month has no such day.
pub fn select_day(
    period: Period,
    day: u32,
    today: NaiveDate,
    monthly: &[Transaction],
) -> Option<DaySelection> {
    let date = period.date(day)?;
    if date == today {
        return Some(DaySelection::Today);
    }
    Some(DaySelection::Day {
        date,
        transactions: on_day(monthly, date),
    })
}
