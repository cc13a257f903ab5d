//! Strict parsing of numeric store values.
//!
//! Catalog tables were imported from spreadsheets, so the same column can come
//! back as `80`, `80.0` or `"80.00"` depending on the backend and the column
//! type. Everything numeric goes through this module exactly once, at the
//! store boundary, and leaves it as a typed `Option`.

use crate::{CourseGraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A loosely typed numeric value as it arrives from a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Parse into a finite `f64`. Blank text is treated as missing.
    fn to_f64(&self, column: &str) -> Result<Option<f64>> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed.parse::<f64>().map_err(|_| {
                    CourseGraphError::InvalidRecord(format!(
                        "{column}: expected a number, got {trimmed:?}"
                    ))
                })?
            }
        };

        if !value.is_finite() {
            return Err(CourseGraphError::InvalidRecord(format!(
                "{column}: value is not finite"
            )));
        }
        Ok(Some(value))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Grade percentage in `[0, 100]`.
pub fn parse_percentage(column: &str, raw: Option<&RawValue>) -> Result<Option<f64>> {
    let Some(value) = parse_f64(column, raw)? else {
        return Ok(None);
    };
    if !(0.0..=100.0).contains(&value) {
        return Err(CourseGraphError::InvalidRecord(format!(
            "{column}: percentage {value} outside 0..=100"
        )));
    }
    Ok(Some(value))
}

/// Non-negative whole count, e.g. `Total_Students` or `credit_hours`.
pub fn parse_count(column: &str, raw: Option<&RawValue>) -> Result<Option<u32>> {
    let Some(value) = parse_f64(column, raw)? else {
        return Ok(None);
    };
    if value < 0.0 {
        return Err(CourseGraphError::InvalidRecord(format!(
            "{column}: negative count {value}"
        )));
    }
    if value.fract() != 0.0 {
        return Err(CourseGraphError::InvalidRecord(format!(
            "{column}: count {value} is not a whole number"
        )));
    }
    if value > f64::from(u32::MAX) {
        return Err(CourseGraphError::InvalidRecord(format!(
            "{column}: count {value} is too large"
        )));
    }
    Ok(Some(value as u32))
}

/// Whole identifier such as `requirement_group_id`. Unlike counts, a missing
/// identifier is an error.
pub fn parse_identifier(column: &str, raw: Option<&RawValue>) -> Result<i64> {
    let value = parse_f64(column, raw)?.ok_or_else(|| {
        CourseGraphError::InvalidRecord(format!("{column}: missing identifier"))
    })?;
    if value.fract() != 0.0 || value.abs() > 9_007_199_254_740_992.0 {
        return Err(CourseGraphError::InvalidRecord(format!(
            "{column}: {value} is not a valid identifier"
        )));
    }
    Ok(value as i64)
}

fn parse_f64(column: &str, raw: Option<&RawValue>) -> Result<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(value) => value.to_f64(column),
    }
}
