//! Normalizes the loosely-shaped JSON the budgeting service returns into strict types.
//!
//! Transaction lists arrive either as a bare array or wrapped as `{"data": [...]}`. Anything else
//! is an `ApiError::UnexpectedShape`.

use crate::error::ApiError;
use crate::model::{Amount, Transaction, TransactionType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::{trace, warn};

type Res<T> = std::result::Result<T, ApiError>;

/// Which name to give a transaction that arrived without a category.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NameFallback {
    /// Today's list: `Product` for incomes and `Expense` for costs.
    ByType,
    /// A month's list: always `Unknown`.
    Unknown,
}

impl NameFallback {
    fn name(&self, kind: TransactionType) -> &'static str {
        match (self, kind) {
            (NameFallback::ByType, TransactionType::Income) => "Product",
            (NameFallback::ByType, TransactionType::Costs) => "Expense",
            (NameFallback::Unknown, _) => "Unknown",
        }
    }
}

/// Turns a list response into transactions. Records with a type other than `income` or `costs`
/// are skipped.
pub fn transactions(body: Value, fallback: NameFallback) -> Res<Vec<Transaction>> {
    let records = match body {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(ApiError::unexpected_shape(format!(
                    "expected 'data' to be a list, got {}",
                    kind_of(&other)
                )))
            }
            None => {
                return Err(ApiError::unexpected_shape(
                    "expected a list or an object with a 'data' list",
                ))
            }
        },
        other => {
            return Err(ApiError::unexpected_shape(format!(
                "expected a list of transactions, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut out = Vec::with_capacity(records.len());
    for (ix, record) in records.iter().enumerate() {
        if let Some(transaction) = transaction(record, fallback)
            .map_err(|e| ApiError::unexpected_shape(format!("record {ix}: {e}")))?
        {
            out.push(transaction);
        }
    }
    trace!("Normalized {} of {} records", out.len(), records.len());
    Ok(out)
}

fn transaction(record: &Value, fallback: NameFallback) -> Res<Option<Transaction>> {
    let obj = record
        .as_object()
        .ok_or_else(|| ApiError::unexpected_shape(format!("expected an object, got {}", kind_of(record))))?;

    let tag = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::unexpected_shape("missing 'type'"))?;
    let Some(kind) = TransactionType::parse(tag) else {
        warn!("Skipping a transaction with unknown type '{tag}'");
        return Ok(None);
    };

    let id = match obj.get("_id").or_else(|| obj.get("id")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ApiError::unexpected_shape("missing '_id'")),
    };

    let amount = amount(obj.get("amount"))?;

    let date = obj
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::unexpected_shape("missing 'date'"))?;
    let date =
        parse_date(date).ok_or_else(|| ApiError::unexpected_shape(format!("invalid date '{date}'")))?;

    let name = match obj.get("category").and_then(Value::as_str) {
        Some(category) if !category.trim().is_empty() => category.to_string(),
        _ => fallback.name(kind).to_string(),
    };

    Ok(Some(Transaction {
        id,
        name,
        amount,
        kind,
        date,
    }))
}

fn amount(value: Option<&Value>) -> Res<Amount> {
    let value = match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| ApiError::unexpected_shape(format!("invalid amount {n}: {e}")))?,
        Some(Value::String(s)) => {
            return Amount::from_str(s)
                .map_err(|e| ApiError::unexpected_shape(format!("invalid amount '{s}': {e}")))
        }
        _ => return Err(ApiError::unexpected_shape("missing 'amount'")),
    };
    Amount::new(value).map_err(|e| ApiError::unexpected_shape(e.to_string()))
}

/// Reduces an ISO-8601 date or date-time to its calendar day. Timestamps with an offset are
/// converted to UTC first.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The id of a created transaction, from `{"data": {"_id": ...}}`. `None` when the service did not
/// send one.
pub fn created_id(body: &Value) -> Option<String> {
    let data = body.get("data")?;
    match data.get("_id").or_else(|| data.get("id"))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The session token from a login response, either `{"token"}` or `{"data": {"token"}}`.
pub fn token(body: &Value) -> Res<String> {
    body.get("token")
        .or_else(|| body.get("data").and_then(|d| d.get("token")))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| ApiError::unexpected_shape("login response has no 'token'"))
}

/// The human-readable message of an error body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(String::from)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
