//! Lenient field decoders for the generated JSON datasets.
//!
//! The upstream generator writes absent strings as `""`, editorship years as
//! strings and link weights as floats. These helpers normalise all of that
//! into explicit `Option`s and integers at the serde boundary.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::person::Year;

/// Decode an optional string, treating `""` and `null` as absent.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Decode an optional year from an integer, an integral float, or a string
/// whose first `-`-separated component is all digits.
pub fn opt_year<'de, D>(deserializer: D) -> Result<Option<Year>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(year_from_value))
}

pub(crate) fn year_from_value(value: &Value) -> Option<Year> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Year::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(|f| Year::try_from(f as i64).ok())
            }
        }
        Value::String(s) => year_from_str(s),
        _ => None,
    }
}

pub(crate) fn year_from_str(s: &str) -> Option<Year> {
    let head = s.trim().split('-').next()?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Decode a positive integral link weight (the generator emits `2.0`).
pub fn weight<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Number(n) => n,
        other => return Err(D::Error::custom(format!("invalid weight: {other}"))),
    };

    let weight = match n.as_u64() {
        Some(w) => Some(w),
        None => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
            .map(|f| f as u64),
    };

    match weight.and_then(|w| u32::try_from(w).ok()) {
        Some(w) if w > 0 => Ok(w),
        _ => Err(D::Error::custom(format!("weight must be a positive integer, got {n}"))),
    }
}
