//! Compile-time view of variables.
//!
//! The compiler never looks at runtime bindings. Instead it consults
//! [`Declarations`], which record the static type of each variable name
//! (a scalar tag, or a dataset schema).

pub mod column_info;

pub use column_info::{Column, CommonColumns, Role};

use crate::access::{Bindings, Value, ValueType};
use std::collections::HashMap;

/// Static type of a declared variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableType {
    Scalar(ValueType),
    Dataset(Vec<Column>),
}

impl VariableType {
    pub fn value_type(&self) -> ValueType {
        match self {
            VariableType::Scalar(value_type) => *value_type,
            VariableType::Dataset(_) => ValueType::Dataset,
        }
    }

    pub fn columns(&self) -> Option<&[Column]> {
        match self {
            VariableType::Scalar(_) => None,
            VariableType::Dataset(columns) => Some(columns),
        }
    }

    /// Static type describing a runtime value.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Dataset(dataset) => VariableType::Dataset(dataset.columns().to_vec()),
            other => VariableType::Scalar(other.value_type()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations {
    variables: HashMap<String, VariableType>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, variable_type: VariableType) {
        self.variables.insert(name.into(), variable_type);
    }

    pub fn with_scalar(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.declare(name, VariableType::Scalar(value_type));
        self
    }

    pub fn with_dataset(mut self, name: impl Into<String>, columns: Vec<Column>) -> Self {
        self.declare(name, VariableType::Dataset(columns));
        self
    }

    pub fn get(&self, name: &str) -> Option<&VariableType> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Derive declarations from the values a caller is about to bind.
    pub fn infer(bindings: &Bindings) -> Self {
        Self {
            variables: bindings
                .iter()
                .map(|(name, value)| (name.clone(), VariableType::of_value(value)))
                .collect(),
        }
    }
}
