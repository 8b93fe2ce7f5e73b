//! Comparison compiler: `= <> < <= > >=`.
//!
//! Any scalar may be compared, but both sides must be reconcilable: the same
//! type, two numerics, or a `null` on either side.

use crate::access::ValueType;
use crate::expression::type_checker::{check_operand, comparable, COMPARISON_TYPES};
use crate::expression::{
    CompileError, CompileResult, CompiledExpression, ComparisonOperator, ExpressionCompiler, Node,
};
use crate::syntax::{ExprContext, ParseNode};

pub struct ComparisonCompiler<'c, 'a> {
    compiler: &'c ExpressionCompiler<'a>,
}

impl<'c, 'a> ComparisonCompiler<'c, 'a> {
    pub fn new(compiler: &'c ExpressionCompiler<'a>) -> Self {
        Self { compiler }
    }

    pub fn compile(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let ExprContext::ComparisonExpr { left, op, right } = node.context() else {
            return Err(CompileError::internal(format!(
                "comparison compiler received a {} node",
                node.kind()
            )));
        };
        let operator = ComparisonOperator::from_token(op.kind).ok_or_else(|| {
            CompileError::internal(format!("comparison compiler received operator '{}'", op.text))
        })?;

        let left_expr = self.compiler.compile(left)?;
        let right_expr = self.compiler.compile(right)?;
        check_operand(left, left_expr.value_type(), &COMPARISON_TYPES)?;
        check_operand(right, right_expr.value_type(), &COMPARISON_TYPES)?;

        if !comparable(left_expr.value_type(), right_expr.value_type()) {
            return Err(CompileError::OperatorType {
                operator: op.text.clone(),
                left: left_expr.value_type().to_string(),
                right: right_expr.value_type().to_string(),
                span: op.span,
            });
        }

        Ok(CompiledExpression::scalar(
            ValueType::Boolean,
            Node::Comparison {
                op: operator,
                left: Box::new(left_expr),
                right: Box::new(right_expr),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Bindings, Value};
    use crate::catalog::{Column, Declarations};
    use crate::expression::ErrorKind;
    use crate::syntax::parse_expression;
    use chrono::NaiveDate;

    fn compile(source: &str, declarations: &Declarations) -> CompileResult<CompiledExpression> {
        let node = parse_expression(source).unwrap();
        ExpressionCompiler::new(declarations).compile(&node)
    }

    fn evaluate(source: &str) -> Value {
        compile(source, &Declarations::new())
            .unwrap()
            .resolve(&Bindings::new())
            .unwrap()
    }

    #[test]
    fn test_integer_comparisons() {
        assert_eq!(evaluate("1 < 2"), Value::Boolean(true));
        assert_eq!(evaluate("2 < 1"), Value::Boolean(false));
        assert_eq!(evaluate("1 <= 1"), Value::Boolean(true));
        assert_eq!(evaluate("1 > 2"), Value::Boolean(false));
        assert_eq!(evaluate("2 >= 2"), Value::Boolean(true));
        assert_eq!(evaluate("1 = 1"), Value::Boolean(true));
        assert_eq!(evaluate("1 <> 1"), Value::Boolean(false));
    }

    #[test]
    fn test_float_comparisons() {
        assert_eq!(evaluate("1.1 < 2.2"), Value::Boolean(true));
        assert_eq!(evaluate("1.1 <= 1.1"), Value::Boolean(true));
        assert_eq!(evaluate("2.2 > 1.1"), Value::Boolean(true));
        assert_eq!(evaluate("1.1 >= 2.2"), Value::Boolean(false));
        assert_eq!(evaluate("1.1 = 1.1"), Value::Boolean(true));
        assert_eq!(evaluate("1.1 <> 1.1"), Value::Boolean(false));
        assert_eq!(evaluate("1 = 1.0"), Value::Boolean(true));
    }

    #[test]
    fn test_other_scalars() {
        assert_eq!(evaluate("\"abc\" < \"abd\""), Value::Boolean(true));
        assert_eq!(evaluate("true = false"), Value::Boolean(false));
        assert_eq!(evaluate("null = 1"), Value::Null);

        let declarations = Declarations::new()
            .with_scalar("start", ValueType::Date)
            .with_scalar("end", ValueType::Date);
        let expr = compile("start < end", &declarations).unwrap();
        let bindings = Bindings::new()
            .with("start", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .with("end", NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(expr.resolve(&bindings).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_irreconcilable_operands() {
        let err = compile("\"a\" = 1", &Declarations::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperatorType);
        assert_eq!(
            err.to_string(),
            "operator '=' cannot be applied to 'STRING', 'INTEGER' at line 1, column 5"
        );
    }

    #[test]
    fn test_unknown_right_operand_precedes_type_check() {
        let declarations = Declarations::new()
            .with_dataset("ds", vec![Column::identifier("id", ValueType::Integer)]);
        let err = compile("ds = limit", &declarations).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariable);
    }

    #[test]
    fn test_datasets_are_not_comparable() {
        let declarations = Declarations::new()
            .with_dataset("ds", vec![Column::identifier("id", ValueType::Integer)]);
        let err = compile("ds = 1", &declarations).unwrap_err();
        match err {
            CompileError::TypeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, ValueType::SCALARS.to_vec());
                assert_eq!(actual, ValueType::Dataset);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
