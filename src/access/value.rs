use crate::access::Dataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Static type tags of the language.
///
/// `Null` is the type of the `null` literal and acts as a wildcard during
/// type checking: a position accepting any concrete type also accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Integer,
    Number,
    String,
    Boolean,
    Date,
    Duration,
    Dataset,
    Null,
}

impl ValueType {
    /// Every tag a scalar value can carry.
    pub const SCALARS: [ValueType; 7] = [
        ValueType::Integer,
        ValueType::Number,
        ValueType::String,
        ValueType::Boolean,
        ValueType::Date,
        ValueType::Duration,
        ValueType::Null,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "INTEGER",
            ValueType::Number => "NUMBER",
            ValueType::String => "STRING",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Date => "DATE",
            ValueType::Duration => "DURATION",
            ValueType::Dataset => "DATASET",
            ValueType::Null => "NULL",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Number)
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, ValueType::Dataset)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime values produced by resolving an expression.
///
/// Dataset rows only ever hold the scalar variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Number(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDate),
    /// Period indicator (`D`, `W`, `M`, `Q`, `S`, `A`).
    Duration(String),
    Dataset(Arc<Dataset>),
}

impl Value {
    /// Get the type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Integer(_) => ValueType::Integer,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Date(_) => ValueType::Date,
            Value::Duration(_) => ValueType::Duration,
            Value::Dataset(_) => ValueType::Dataset,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value may be bound to a variable declared with `value_type`
    pub fn is_compatible_with(&self, value_type: ValueType) -> bool {
        match (self, value_type) {
            (Value::Null, _) => true,
            (Value::Integer(_), ValueType::Integer | ValueType::Number) => true,
            (Value::Number(_), ValueType::Number) => true,
            (Value::String(_), ValueType::String) => true,
            (Value::Boolean(_), ValueType::Boolean) => true,
            (Value::Date(_), ValueType::Date) => true,
            (Value::Duration(_), ValueType::Duration) => true,
            (Value::Dataset(_), ValueType::Dataset) => true,
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            Value::Date(d) => Some(day_number(d) as f64),
            _ => None,
        }
    }

    pub fn as_dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Value::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Dates take part in arithmetic as their day number; other values are
    /// returned unchanged.
    pub fn to_day_count(&self) -> Value {
        match self {
            Value::Date(d) => Value::Integer(day_number(d)),
            other => other.clone(),
        }
    }
}

/// Days elapsed since 1970-01-01.
pub fn day_number(date: &NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Duration(d) => f.write_str(d),
            Value::Dataset(dataset) => write!(f, "{}", dataset),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<Dataset> for Value {
    fn from(value: Dataset) -> Self {
        Value::Dataset(Arc::new(value))
    }
}
