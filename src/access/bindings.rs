//! Binding environment supplied at resolution time.

use crate::access::{Dataset, Row, Value, ValueType};
use crate::catalog::Column;
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Immutable mapping from variable name to runtime value.
///
/// Callers build one environment per evaluation request. The engine only
/// ever reads from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Load bindings from a JSON object.
    ///
    /// Scalars map directly (`null`, booleans, integers, floats, strings).
    /// Dates are written `{"date": "YYYY-MM-DD"}`, durations
    /// `{"duration": "M"}`, and datasets `{"columns": [...], "rows": [...]}`
    /// where each column is `{"name", "role", "type"}`.
    pub fn from_json(source: &str) -> Result<Self> {
        let document: JsonValue =
            serde_json::from_str(source).context("Failed to parse bindings JSON")?;
        let JsonValue::Object(entries) = document else {
            bail!("Bindings must be a JSON object");
        };

        let mut bindings = Bindings::new();
        for (name, json) in entries {
            let value = json_to_value(&json, None)
                .with_context(|| format!("Invalid value for binding '{}'", name))?;
            bindings.insert(name, value);
        }
        Ok(bindings)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn json_to_value(json: &JsonValue, declared: Option<ValueType>) -> Result<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => match (n.as_i64(), declared) {
            (Some(i), Some(ValueType::Number)) => Ok(Value::Number(i as f64)),
            (Some(i), _) => Ok(Value::Integer(i)),
            (None, _) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| anyhow!("Unsupported number: {}", n)),
        },
        JsonValue::String(s) => match declared {
            Some(ValueType::Date) => parse_date(s),
            Some(ValueType::Duration) => Ok(Value::Duration(s.clone())),
            _ => Ok(Value::String(s.clone())),
        },
        JsonValue::Object(object) => object_to_value(object),
        JsonValue::Array(_) => bail!("Arrays are not valid values"),
    }
}

fn object_to_value(object: &Map<String, JsonValue>) -> Result<Value> {
    if let Some(JsonValue::String(date)) = object.get("date") {
        return parse_date(date);
    }
    if let Some(JsonValue::String(duration)) = object.get("duration") {
        return Ok(Value::Duration(duration.clone()));
    }
    if let (Some(columns), Some(JsonValue::Array(rows))) = (object.get("columns"), object.get("rows"))
    {
        let columns: Vec<Column> =
            serde_json::from_value(columns.clone()).context("Invalid dataset columns")?;
        let rows = rows
            .iter()
            .map(|row| json_to_row(row, &columns))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Value::from(Dataset::with_rows(columns, rows)));
    }
    bail!("Unrecognized object value; expected date, duration or dataset")
}

fn json_to_row(json: &JsonValue, columns: &[Column]) -> Result<Row> {
    let JsonValue::Object(cells) = json else {
        bail!("Dataset rows must be JSON objects");
    };
    let mut row = Row::new();
    for column in columns {
        let value = match cells.get(&column.name) {
            Some(cell) => json_to_value(cell, Some(column.value_type))
                .with_context(|| format!("Invalid cell in column '{}'", column.name))?,
            None => Value::Null,
        };
        row.insert(column.name.clone(), value);
    }
    Ok(row)
}

fn parse_date(text: &str) -> Result<Value> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Value::Date)
        .with_context(|| format!("Invalid date '{}'", text))
}
