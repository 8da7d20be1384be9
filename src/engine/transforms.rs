//! Named field transform registry.
//!
//! Strategies reference transforms by name in their field mappings, which
//! keeps strategy data serializable. Every transform is a pure function of a
//! single field's value; a transform failure indicates a strategy/data
//! mismatch and is treated as fatal for the generation attempt.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

pub type TransformFn = fn(&Value) -> Result<Value, TransformError>;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform '{0}' is not registered")]
    Unknown(String),
    #[error("transform '{name}' cannot be applied to {value}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

impl TransformError {
    fn invalid(name: &str, value: &Value, reason: &str) -> Self {
        Self::Invalid {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A transform failure tagged with the field it occurred on.
#[derive(Debug, Error)]
#[error("field '{field}': {source}")]
pub struct FieldTransformError {
    pub field: String,
    #[source]
    pub source: TransformError,
}

/// Registry of named pure transforms.
pub struct TransformRegistry {
    transforms: HashMap<String, TransformFn>,
}

impl TransformRegistry {
    /// Registry pre-populated with the builtin transforms used by the
    /// shipped strategy tables.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            transforms: HashMap::new(),
        };
        registry.register("currency_usd", currency_usd);
        registry.register("date_us", date_us);
        registry.register("uppercase", uppercase);
        registry.register("trim", trim);
        registry
    }

    pub fn register(&mut self, name: &str, transform: TransformFn) {
        self.transforms.insert(name.to_string(), transform);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    pub fn apply(&self, name: &str, value: &Value) -> Result<Value, TransformError> {
        let transform = self
            .transforms
            .get(name)
            .ok_or_else(|| TransformError::Unknown(name.to_string()))?;
        transform(value)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Format a numeric value as a US dollar amount, e.g. `12500` → `"$12,500.00"`.
fn currency_usd(value: &Value) -> Result<Value, TransformError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| TransformError::invalid("currency_usd", value, "expected a number"))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(TransformError::invalid(
            "currency_usd",
            value,
            "expected a non-negative finite number",
        ));
    }

    Ok(Value::String(format!("${}", group_thousands(amount))))
}

fn group_thousands(amount: f64) -> String {
    let formatted = format!("{amount:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{dec_part}")
}

/// Reformat an ISO `YYYY-MM-DD` date string as US `MM/DD/YYYY`.
fn date_us(value: &Value) -> Result<Value, TransformError> {
    let raw = value
        .as_str()
        .ok_or_else(|| TransformError::invalid("date_us", value, "expected a date string"))?;

    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TransformError::invalid("date_us", value, "expected YYYY-MM-DD"))?;

    Ok(Value::String(date.format("%m/%d/%Y").to_string()))
}

fn uppercase(value: &Value) -> Result<Value, TransformError> {
    let raw = value
        .as_str()
        .ok_or_else(|| TransformError::invalid("uppercase", value, "expected a string"))?;
    Ok(Value::String(raw.to_uppercase()))
}

fn trim(value: &Value) -> Result<Value, TransformError> {
    let raw = value
        .as_str()
        .ok_or_else(|| TransformError::invalid("trim", value, "expected a string"))?;
    Ok(Value::String(raw.trim().to_string()))
}
