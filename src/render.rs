//! Plain-text views of the home screen.

use crate::budget::Budget;
use crate::calendar::{CalendarMonth, Cell, DayColor};
use crate::model::{money, Transaction};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const BAR_WIDTH: usize = 20;

/// Renders the month grid. Days with a positive sum are marked `+`, negative `-`, and today is
/// bracketed.
///
/// ```text
///         May 2024
///  Su   Mo   Tu   We   Th   Fr   Sa
///                  1    2    3    4
/// ```
pub fn calendar(month: &CalendarMonth) -> String {
    let mut out = String::new();
    let title = month.period.to_string();
    let width = WEEKDAYS.len() * 5;
    let _ = writeln!(out, "{title:^width$}");
    let header: Vec<String> = WEEKDAYS.iter().map(|d| format!("{d:>3}  ")).collect();
    let _ = writeln!(out, "{}", header.concat().trim_end());
    for week in &month.weeks {
        let line: String = week.iter().map(cell).collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn cell(cell: &Cell) -> String {
    match cell {
        Cell::Padding => " ".repeat(5),
        Cell::Day(day) => {
            let mark = match day.color {
                DayColor::Positive => '+',
                DayColor::Negative => '-',
                DayColor::Neutral => ' ',
            };
            if day.is_today {
                format!("[{:>2}]{mark}", day.day)
            } else {
                format!(" {:>2} {mark}", day.day)
            }
        }
    }
}

/// `Budget: 0 + {income} - {costs} = {budget}$` followed by a bar scaled to the budget.
pub fn budget(budget: &Budget) -> String {
    let filled = (budget.ratio() * BAR_WIDTH as f64).round() as usize;
    let fill = if budget.is_positive() { '+' } else { '-' };
    format!(
        "Budget: 0 + {} - {} = {}$\n[{}{}]",
        money(budget.income),
        money(budget.costs),
        money(budget.value),
        fill.to_string().repeat(filled),
        " ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
    )
}

/// The daily summary: `{day} {Month}` with today's income, costs, and their sum.
pub fn summary(today: NaiveDate, budget: &Budget) -> String {
    let month = crate::model::MONTH_NAMES[today.month0() as usize];
    format!(
        "{} {month}\n  Income: {}\n  Costs:  {}\n  Sum:    {}",
        today.day(),
        money(budget.income),
        money(budget.costs),
        money(budget.value),
    )
}

/// One line per transaction, incomes with `+` and costs with `-`.
pub fn transactions(date: NaiveDate, list: &[Transaction]) -> String {
    let mut out = format!("{}\n", date.format("%Y-%m-%d"));
    if list.is_empty() {
        out.push_str("  No transactions");
        return out;
    }
    for t in list {
        let sign = if t.is_income() { '+' } else { '-' };
        let _ = writeln!(out, "  {sign}{:>12}  {}", t.amount.to_string(), t.name);
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Period, TransactionType};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn t(amount: &str, kind: TransactionType, day: u32) -> Transaction {
        Transaction {
            id: format!("{day}"),
            name: String::from("Lunch"),
            amount: Amount::from_str(amount).unwrap(),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        }
    }

    #[test]
    fn test_calendar_marks() {
        let list = vec![
            t("100", TransactionType::Income, 10),
            t("5", TransactionType::Costs, 11),
        ];
        let month = CalendarMonth::build(Period::new(4, 2024).unwrap(), &list, today());
        let text = calendar(&month);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim(), "May 2024");
        assert!(lines[1].starts_with(" Su"));
        // Header, weekday row, five weeks.
        assert_eq!(lines.len(), 7);
        assert!(text.contains(" 10 +"));
        assert!(text.contains(" 11 -"));
        assert!(text.contains("[15]"));
        assert!(lines[2].ends_with("4"));
    }

    #[test]
    fn test_budget_line() {
        let b = Budget::new(Decimal::from(100), Decimal::from(40));
        let text = budget(&b);
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "Budget: 0 + 100.00 - 40.00 = 60.00$");
        // 60 / 1000 of 20 cells rounds to one.
        assert_eq!(lines.next().unwrap(), format!("[+{}]", " ".repeat(19)));
    }

    #[test]
    fn test_budget_bar_clamps() {
        let b = Budget::new(Decimal::ZERO, Decimal::from(5000));
        let text = budget(&b);
        assert!(text.contains(&format!("[{}]", "-".repeat(20))));
        assert!(text.contains("= -5,000.00$"));
    }

    #[test]
    fn test_summary() {
        let b = Budget::new(Decimal::from(10), Decimal::from(4));
        let text = summary(today(), &b);
        assert!(text.starts_with("15 May"));
        assert!(text.contains("Sum:    6.00"));
    }

    #[test]
    fn test_transactions() {
        let list = vec![t("12.5", TransactionType::Costs, 10)];
        let text = transactions(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), &list);
        assert!(text.starts_with("2024-05-10"));
        assert!(text.contains("-       12.50  Lunch"));
        let empty = transactions(today(), &[]);
        assert!(empty.ends_with("No transactions"));
    }
}
