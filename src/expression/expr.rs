//! Compiled expression tree.

use crate::access::{Value, ValueType};
use crate::catalog::Column;
use crate::executor::JoinSpec;
use crate::expression::{
    ArithmeticOperator, BooleanOperator, ComparisonOperator, UnaryOperator,
};

/// A type-checked expression, ready to be resolved against any number of
/// binding environments.
///
/// `columns` is present exactly when `value_type` is `DATASET`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    value_type: ValueType,
    columns: Option<Vec<Column>>,
    node: Node,
}

/// Operation performed by a compiled expression. Children are owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(Value),
    Variable {
        name: String,
        declared: ValueType,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<CompiledExpression>,
    },
    /// Scalar arithmetic
    Arithmetic {
        op: ArithmeticOperator,
        left: Box<CompiledExpression>,
        right: Box<CompiledExpression>,
    },
    /// Arithmetic broadcast over two datasets through a join
    DatasetArithmetic {
        op: ArithmeticOperator,
        left: Box<CompiledExpression>,
        right: Box<CompiledExpression>,
        join: JoinSpec,
    },
    Concatenation {
        left: Box<CompiledExpression>,
        right: Box<CompiledExpression>,
    },
    Boolean {
        op: BooleanOperator,
        left: Box<CompiledExpression>,
        right: Box<CompiledExpression>,
    },
    Comparison {
        op: ComparisonOperator,
        left: Box<CompiledExpression>,
        right: Box<CompiledExpression>,
    },
}

impl CompiledExpression {
    /// Create a scalar-typed expression
    pub fn scalar(value_type: ValueType, node: Node) -> Self {
        Self {
            value_type,
            columns: None,
            node,
        }
    }

    /// Create a dataset-typed expression with its static schema
    pub fn dataset(columns: Vec<Column>, node: Node) -> Self {
        Self {
            value_type: ValueType::Dataset,
            columns: Some(columns),
            node,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Static schema of a dataset expression
    pub fn columns(&self) -> Option<&[Column]> {
        self.columns.as_deref()
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn is_dataset(&self) -> bool {
        self.value_type == ValueType::Dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_dataset_constructors() {
        let expr = CompiledExpression::scalar(ValueType::Integer, Node::Constant(Value::Integer(1)));
        assert_eq!(expr.value_type(), ValueType::Integer);
        assert!(expr.columns().is_none());
        assert!(!expr.is_dataset());

        let columns = vec![Column::identifier("id", ValueType::Integer)];
        let expr = CompiledExpression::dataset(
            columns.clone(),
            Node::Variable {
                name: "ds".to_string(),
                declared: ValueType::Dataset,
            },
        );
        assert!(expr.is_dataset());
        assert_eq!(expr.columns(), Some(columns.as_slice()));
    }

    #[test]
    fn test_compiled_expressions_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledExpression>();
    }
}
