//! Runtime value layer.
//!
//! This module provides the values an expression resolves to:
//!
//! - **Value**: scalar values and datasets
//! - **ValueType**: the closed set of type tags used by the type checker
//! - **Dataset**: rows of named scalar values over a column schema
//! - **Bindings**: the name to value environment supplied at resolve time

pub mod bindings;
pub mod dataset;
pub mod value;

pub use bindings::Bindings;
pub use dataset::{Dataset, Row};
pub use value::{day_number, Value, ValueType};
