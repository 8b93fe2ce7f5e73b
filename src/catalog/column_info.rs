//! Column information and schema helpers.

use crate::access::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a column plays inside a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Part of row identity; used as join key.
    Identifier,
    /// Quantitative value combined by arithmetic operators.
    Measure,
    /// Descriptive metadata, never joined or combined.
    Attribute,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Identifier => f.write_str("IDENTIFIER"),
            Role::Measure => f.write_str("MEASURE"),
            Role::Attribute => f.write_str("ATTRIBUTE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub role: Role,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl Column {
    pub fn new(name: impl Into<String>, role: Role, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            role,
            value_type,
        }
    }

    pub fn identifier(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, Role::Identifier, value_type)
    }

    pub fn measure(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, Role::Measure, value_type)
    }

    pub fn attribute(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, Role::Attribute, value_type)
    }

    /// Columns of two schemas are common when name, role and type all match.
    pub fn is_common_with(&self, other: &Column) -> bool {
        self.name == other.name && self.role == other.role && self.value_type == other.value_type
    }
}

/// Columns shared by both schemas, partitioned by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonColumns {
    pub identifiers: Vec<Column>,
    pub measures: Vec<Column>,
    pub attributes: Vec<Column>,
}

impl CommonColumns {
    /// Intersect two schemas, keeping the left schema's column order.
    pub fn between(left: &[Column], right: &[Column]) -> Self {
        let mut common = CommonColumns::default();
        for column in left
            .iter()
            .filter(|l| right.iter().any(|r| l.is_common_with(r)))
        {
            match column.role {
                Role::Identifier => common.identifiers.push(column.clone()),
                Role::Measure => common.measures.push(column.clone()),
                Role::Attribute => common.attributes.push(column.clone()),
            }
        }
        common
    }
}
