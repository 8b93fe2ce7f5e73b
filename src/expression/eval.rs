//! Resolution of compiled expressions against a binding environment.

use crate::access::{Bindings, Value, ValueType};
use crate::catalog::{Column, Role};
use crate::executor::hash_join;
use crate::expression::{CompiledExpression, Node, ResolveError, ResolveResult};
use std::sync::Arc;

/// Evaluator for compiled expressions
pub struct ExpressionEvaluator<'a> {
    /// Values of the variables the expression refers to
    bindings: &'a Bindings,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self { bindings }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &CompiledExpression) -> ResolveResult<Value> {
        match expr.node() {
            Node::Constant(value) => Ok(value.clone()),

            Node::Variable { name, declared } => {
                self.evaluate_variable(name, *declared, expr.columns())
            }

            Node::Unary { op, operand } => op.apply(&self.evaluate(operand)?),

            Node::Arithmetic { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                if left_val.is_null() || right_val.is_null() {
                    return Ok(Value::Null);
                }
                op.apply(&left_val, &right_val)
            }

            Node::DatasetArithmetic {
                op,
                left,
                right,
                join,
            } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                match (&left_val, &right_val) {
                    (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
                    (Value::Dataset(l), Value::Dataset(r)) => {
                        let joined = hash_join(l, r, join, |a, b| op.apply(a, b))?;
                        Ok(Value::Dataset(Arc::new(joined)))
                    }
                    _ => Err(ResolveError::internal(format!(
                        "dataset operator '{}' resolved {} and {} operands",
                        op.as_str(),
                        left_val.value_type(),
                        right_val.value_type()
                    ))),
                }
            }

            Node::Concatenation { left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                match (&left_val, &right_val) {
                    (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
                    (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                    _ => Err(ResolveError::InvalidOperands {
                        operator: "||".to_string(),
                        left: left_val.value_type(),
                        right: right_val.value_type(),
                    }),
                }
            }

            Node::Boolean { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                op.apply(&left_val, &right_val)
            }

            Node::Comparison { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                op.apply(&left_val, &right_val)
            }
        }
    }

    /// Look up a variable and check it against its declared type
    fn evaluate_variable(
        &self,
        name: &str,
        declared: ValueType,
        schema: Option<&[Column]>,
    ) -> ResolveResult<Value> {
        let value = self
            .bindings
            .get(name)
            .ok_or_else(|| ResolveError::UnboundVariable {
                name: name.to_string(),
            })?;

        if !value.is_compatible_with(declared) {
            return Err(ResolveError::BindingTypeMismatch {
                name: name.to_string(),
                expected: declared,
                actual: value.value_type(),
            });
        }

        if let (Value::Dataset(dataset), Some(schema)) = (value, schema) {
            check_schema(name, dataset.columns(), schema)?;
        }

        match (value, declared) {
            (Value::Integer(i), ValueType::Number) => Ok(Value::Number(*i as f64)),
            _ => Ok(value.clone()),
        }
    }
}

/// Every declared identifier and measure must be present in the bound dataset
/// with the same role and type.
fn check_schema(name: &str, bound: &[Column], declared: &[Column]) -> ResolveResult<()> {
    let missing = declared
        .iter()
        .filter(|column| matches!(column.role, Role::Identifier | Role::Measure))
        .find(|column| !bound.iter().any(|b| b.is_common_with(column)));

    match missing {
        Some(column) => Err(ResolveError::SchemaMismatch {
            name: name.to_string(),
            column: column.name.clone(),
            role: column.role,
            value_type: column.value_type,
        }),
        None => Ok(()),
    }
}

impl CompiledExpression {
    /// Resolve the expression to a value under `bindings`.
    ///
    /// The expression is not tied to the environment: the same compiled
    /// expression may be resolved again, from any thread, with other
    /// bindings.
    pub fn resolve(&self, bindings: &Bindings) -> ResolveResult<Value> {
        ExpressionEvaluator::new(bindings).evaluate(self)
    }
}
