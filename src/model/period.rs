use anyhow::ensure;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::ops::RangeInclusive;
use std::fmt::{Display, Formatter};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The years a `Period` may fall in.
pub const YEARS: RangeInclusive<i32> = 1..=9999;

/// Returns the month before `month` (0–11), rolling back into the previous year after January.
pub fn prev_month(month: u32, year: i32) -> (u32, i32) {
    if month == 0 {
        (11, year.saturating_sub(1))
    } else {
        (month - 1, year)
    }
}

/// Returns the month after `month` (0–11), rolling into the next year after December.
pub fn next_month(month: u32, year: i32) -> (u32, i32) {
    if month == 11 {
        (0, year.saturating_add(1))
    } else {
        (month + 1, year)
    }
}

/// The currently selected (month, year) pair. `month` is zero-based, 0 is January.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> crate::Result<Self> {
        ensure!(month <= 11, "Month must be in 0..=11, got {month}");
        ensure!(
            YEARS.contains(&year),
            "Year must be in {}..={}, got {year}",
            YEARS.start(),
            YEARS.end()
        );
        Ok(Self { year, month })
    }

    /// The period that contains `date`, with the year clamped to `YEARS`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(*YEARS.start(), *YEARS.end()),
            month: date.month0(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month number, 1–12.
    pub fn month_number(&self) -> u32 {
        self.month + 1
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }

    /// The month before. January of the first year stays where it is.
    pub fn prev(&self) -> Self {
        let (month, year) = prev_month(self.month, self.year);
        Self::new(month, year).unwrap_or(*self)
    }

    /// The month after. December of the last year stays where it is.
    pub fn next(&self) -> Self {
        let (month, year) = next_month(self.month, self.year);
        Self::new(month, year).unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    /// The date of `day` within this period, if the month has such a day.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month_number(), day)
    }

    pub fn first_day(&self) -> NaiveDate {
        // Day 1 exists in every month of every year in `YEARS`.
        NaiveDate::from_ymd_opt(self.year, self.month_number(), 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|day| self.date(*day).is_some())
            .unwrap_or(28)
    }

    /// Weekday of the first day of the month, 0 is Sunday.
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_month_rolls_year() {
        assert_eq!(next_month(11, 2024), (0, 2025));
        assert_eq!(next_month(4, 2024), (5, 2024));
    }

    #[test]
    fn test_prev_month_rolls_year() {
        assert_eq!(prev_month(0, 2024), (11, 2023));
        assert_eq!(prev_month(5, 2024), (4, 2024));
    }

    #[test]
    fn test_next_then_prev_is_identity() {
        for year in [1999, 2024, 2025] {
            for month in 0..12 {
                let (m, y) = next_month(month, year);
                assert_eq!(prev_month(m, y), (month, year));
                let (m, y) = prev_month(month, year);
                assert_eq!(next_month(m, y), (month, year));
            }
        }
    }

    #[test]
    fn test_new_rejects_month_12() {
        assert!(Period::new(12, 2024).is_err());
        assert!(Period::new(11, 2024).is_ok());
    }

    #[test]
    fn test_month_functions_saturate() {
        assert_eq!(next_month(11, i32::MAX), (0, i32::MAX));
        assert_eq!(prev_month(0, i32::MIN), (11, i32::MIN));
    }

    #[test]
    fn test_new_rejects_years_out_of_range() {
        assert!(Period::new(11, i32::MAX).is_err());
        assert!(Period::new(0, 0).is_err());
        assert!(Period::new(0, 10_000).is_err());
        assert!(Period::new(11, 9999).is_ok());
    }

    #[test]
    fn test_navigation_stops_at_range_edges() {
        let last = Period::new(11, 9999).unwrap();
        assert_eq!(last.next(), last);
        assert_eq!(last.days_in_month(), 31);
        assert_eq!(last.prev(), Period::new(10, 9999).unwrap());
        let first = Period::new(0, 1).unwrap();
        assert_eq!(first.prev(), first);
        assert_eq!(first.first_day(), NaiveDate::from_ymd_opt(1, 1, 1).unwrap());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(Period::new(1, 2024).unwrap().days_in_month(), 29);
        assert_eq!(Period::new(1, 2023).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(11, 2024).unwrap().days_in_month(), 31);
        assert_eq!(Period::new(3, 2024).unwrap().days_in_month(), 30);
    }

    #[test]
    fn test_first_weekday() {
        // 1 May 2024 was a Wednesday.
        assert_eq!(Period::new(4, 2024).unwrap().first_weekday(), 3);
        // 1 September 2024 was a Sunday.
        assert_eq!(Period::new(8, 2024).unwrap().first_weekday(), 0);
    }

    #[test]
    fn test_contains_and_containing() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let period = Period::containing(date);
        assert_eq!(period.month(), 4);
        assert_eq!(period.month_number(), 5);
        assert!(period.contains(date));
        assert!(!period.next().contains(date));
        assert_eq!(period.to_string(), "May 2024");
    }

    #[test]
    fn test_date_out_of_range() {
        let period = Period::new(1, 2023).unwrap();
        assert!(period.date(29).is_none());
        assert_eq!(period.date(28), NaiveDate::from_ymd_opt(2023, 2, 28));
    }
}
