use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Calendar format accepted for transaction dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single `{amount, date}` record inside a category.
///
/// The date is kept as the raw string that was stored; it is only validated when
/// entered interactively, so malformed values loaded from disk survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: Amount,
    pub date: String,
}

impl Transaction {
    pub fn new(amount: f64, date: impl Into<String>) -> Self {
        Self {
            amount: Amount::Value(amount),
            date: date.into(),
        }
    }

    /// Parsed date, or `None` when the stored text is not `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Stored amount. Anything that is not a JSON number is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Value(f64),
    Raw(serde_json::Value),
}

impl Amount {
    /// Numeric view of the amount. Strings holding a decimal number count as numeric.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Amount::Value(value) => Some(*value),
            Amount::Raw(serde_json::Value::String(text)) => text.trim().parse().ok(),
            Amount::Raw(_) => None,
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Value(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Value(value) => write!(f, "{}", value),
            Amount::Raw(serde_json::Value::String(text)) => f.write_str(text),
            Amount::Raw(other) => write!(f, "{}", other),
        }
    }
}

/// Validates an interactively entered date and returns it unchanged.
pub fn validate_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Parses an amount typed by the user. NaN and infinities are rejected since
/// JSON has no representation for them.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount(input.to_string()))
}

/// Checks an amount that did not come through [`parse_amount`].
pub fn ensure_finite(amount: f64) -> Result<f64, ValidationError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(ValidationError::InvalidAmount(amount.to_string()))
    }
}
