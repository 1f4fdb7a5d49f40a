use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether a transaction brings money in or takes it out. On the wire these are the lowercase tags
/// `income` and `costs`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Costs,
}

serde_plain::derive_display_from_serialize!(TransactionType);

impl TransactionType {
    /// Parses a type tag, ignoring case. Returns `None` for anything other than `income` or
    /// `costs`.
    pub fn parse(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("income") {
            Some(TransactionType::Income)
        } else if tag.eq_ignore_ascii_case("costs") {
            Some(TransactionType::Costs)
        } else {
            None
        }
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown transaction type '{s}', expected income or costs"))
    }
}

/// A single income or cost entry as held by the client. Transactions are immutable once fetched.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    /// The category of the transaction, or a fallback name when the service did not send one.
    pub name: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The calendar day of the transaction. Time of day is dropped at the API boundary.
    pub date: NaiveDate,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_costs(&self) -> bool {
        self.kind == TransactionType::Costs
    }
}

/// The data needed to create a transaction with the remote service.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct NewTransaction {
    pub amount: Amount,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Builds the transaction the client holds locally once the service has accepted the new one.
    /// An empty category falls back to `Unknown`.
    pub fn into_transaction(self, id: String) -> Transaction {
        let name = if self.category.trim().is_empty() {
            String::from("Unknown")
        } else {
            self.category
        };
        Transaction {
            id,
            name,
            amount: self.amount,
            kind: self.kind,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_ignores_case() {
        assert_eq!(TransactionType::parse("Income"), Some(TransactionType::Income));
        assert_eq!(TransactionType::parse("COSTS"), Some(TransactionType::Costs));
        assert_eq!(TransactionType::parse("transfer"), None);
    }

    #[test]
    fn test_type_display() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(TransactionType::Costs.to_string(), "costs");
    }

    #[test]
    fn test_from_str_error() {
        let err = TransactionType::from_str("salary").unwrap_err();
        assert!(err.to_string().contains("salary"));
    }

    #[test]
    fn test_into_transaction_fallback_name() {
        let new = NewTransaction {
            amount: Amount::from_str("5").unwrap(),
            category: String::from("  "),
            kind: TransactionType::Costs,
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        };
        let t = new.into_transaction(String::from("abc"));
        assert_eq!(t.name, "Unknown");
        assert_eq!(t.id, "abc");
        assert!(t.is_costs());
    }

    #[test]
    fn test_serialize_uses_type_key() {
        let t = Transaction {
            id: String::from("1"),
            name: String::from("Salary"),
            amount: Amount::from_str("100").unwrap(),
            kind: TransactionType::Income,
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2024-05-10");
    }
}
