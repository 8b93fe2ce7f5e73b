//! Executor layer for dataset operations.
//!
//! Dataset operands of binary operators are combined row-wise through a
//! relational join on their common identifier columns.

pub mod hash_join;

pub use hash_join::{hash_join, JoinError, JoinKeyPolicy, JoinSpec};
