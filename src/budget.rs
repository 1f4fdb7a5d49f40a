//! The running budget: today's incomes minus today's costs.

use crate::aggregate::Totals;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// The budget value at which the display bar is full.
const FULL_BAR: Decimal = Decimal::ONE_THOUSAND;

pub fn budget(total_income: Decimal, total_costs: Decimal) -> Decimal {
    total_income - total_costs
}

/// `min(|budget| / 1000, 1.0)`. Only the bar is clamped, never the budget itself.
pub fn display_ratio(budget: Decimal) -> f64 {
    let ratio = (budget.abs() / FULL_BAR).min(Decimal::ONE);
    ratio.to_f64().unwrap_or(1.0)
}

/// A budget summary ready for display.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Budget {
    pub income: Decimal,
    pub costs: Decimal,
    pub value: Decimal,
}

impl Budget {
    pub fn new(total_income: Decimal, total_costs: Decimal) -> Self {
        Self {
            income: total_income,
            costs: total_costs,
            value: budget(total_income, total_costs),
        }
    }

    pub fn ratio(&self) -> f64 {
        display_ratio(self.value)
    }

    /// A zero budget counts as positive for coloring.
    pub fn is_positive(&self) -> bool {
        self.value >= Decimal::ZERO
    }
}

impl From<Totals> for Budget {
    fn from(totals: Totals) -> Self {
        Budget::new(totals.income, totals.costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_budget() {
        assert_eq!(budget(dec("100"), dec("40")), dec("60"));
        assert_eq!(budget(dec("10"), dec("40")), dec("-30"));
    }

    #[test]
    fn test_ratio_scales() {
        assert_eq!(display_ratio(dec("250")), 0.25);
        assert_eq!(display_ratio(dec("-500")), 0.5);
        assert_eq!(display_ratio(Decimal::ZERO), 0.0);
    }

    #[test]
    fn test_ratio_clamps_but_value_does_not() {
        let b = Budget::new(dec("5000"), dec("1000"));
        assert_eq!(b.value, dec("4000"));
        assert_eq!(b.ratio(), 1.0);
        let b = Budget::new(Decimal::ZERO, dec("2500"));
        assert_eq!(b.value, dec("-2500"));
        assert_eq!(b.ratio(), 1.0);
        assert!(!b.is_positive());
    }

    #[test]
    fn test_zero_is_positive() {
        assert!(Budget::default().is_positive());
    }

    #[test]
    fn test_from_totals() {
        let totals = Totals {
            income: dec("100"),
            costs: dec("40"),
        };
        assert_eq!(Budget::from(totals).value, dec("60"));
    }
}
