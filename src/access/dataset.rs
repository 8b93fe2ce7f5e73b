//! In-memory datasets: an ordered collection of rows over a column schema.

use crate::access::Value;
use crate::catalog::{Column, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A row maps column names to scalar values.
pub type Row = BTreeMap<String, Value>;

/// Runtime dataset value.
///
/// Identifier values are expected to be unique per row. Producers upstream
/// of the engine guarantee this; it is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Append a row given as `(column, value)` pairs.
    pub fn push_row<I, K>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.rows
            .push(values.into_iter().map(|(k, v)| (k.into(), v)).collect());
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.role == Role::Identifier)
    }

    /// Find the first row whose identifier columns hold `key`, in
    /// identifier order.
    pub fn find_row(&self, key: &[Value]) -> Option<&Row> {
        let identifiers: Vec<&Column> = self.identifiers().collect();
        self.rows.iter().find(|row| {
            identifiers.len() == key.len()
                && identifiers
                    .iter()
                    .zip(key)
                    .all(|(column, value)| row.get(&column.name) == Some(value))
        })
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        write!(f, "{}", header.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| match row.get(&c.name) {
                    Some(value) => value.to_string(),
                    None => String::new(),
                })
                .collect();
            write!(f, "\n{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
