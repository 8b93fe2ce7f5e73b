//! Boolean compiler: `and`, `or`, `xor` and unary `not`.

use crate::access::ValueType;
use crate::expression::type_checker::{check_operand, BOOLEAN_TYPES};
use crate::expression::{
    BooleanOperator, CompileError, CompileResult, CompiledExpression, ExpressionCompiler, Node,
    UnaryOperator,
};
use crate::syntax::{ExprContext, ParseNode, TokenKind};

pub struct BooleanCompiler<'c, 'a> {
    compiler: &'c ExpressionCompiler<'a>,
}

impl<'c, 'a> BooleanCompiler<'c, 'a> {
    pub fn new(compiler: &'c ExpressionCompiler<'a>) -> Self {
        Self { compiler }
    }

    pub fn compile_binary(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let ExprContext::BooleanExpr { left, op, right } = node.context() else {
            return Err(CompileError::internal(format!(
                "boolean compiler received a {} node",
                node.kind()
            )));
        };
        let op = BooleanOperator::from_token(op.kind).ok_or_else(|| {
            CompileError::internal(format!("boolean compiler received operator '{}'", op.text))
        })?;

        let left_expr = self.compiler.compile(left)?;
        let right_expr = self.compiler.compile(right)?;
        check_operand(left, left_expr.value_type(), &BOOLEAN_TYPES)?;
        check_operand(right, right_expr.value_type(), &BOOLEAN_TYPES)?;

        Ok(CompiledExpression::scalar(
            ValueType::Boolean,
            Node::Boolean {
                op,
                left: Box::new(left_expr),
                right: Box::new(right_expr),
            },
        ))
    }

    /// Compile `not operand`
    pub fn compile_unary(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let ExprContext::UnaryExpr { op, right } = node.context() else {
            return Err(CompileError::internal(format!(
                "boolean compiler received a {} node",
                node.kind()
            )));
        };
        if op.kind != TokenKind::Not {
            return Err(CompileError::internal(format!(
                "boolean compiler received unary operator '{}'",
                op.text
            )));
        }

        let operand = self.compiler.compile(right)?;
        check_operand(right, operand.value_type(), &BOOLEAN_TYPES)?;

        Ok(CompiledExpression::scalar(
            ValueType::Boolean,
            Node::Unary {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Bindings, Value};
    use crate::catalog::Declarations;
    use crate::expression::ErrorKind;
    use crate::syntax::{parse_expression, Literal, OpToken, Span};

    fn compile(source: &str, declarations: &Declarations) -> CompileResult<CompiledExpression> {
        let node = parse_expression(source).unwrap();
        ExpressionCompiler::new(declarations).compile(&node)
    }

    #[test]
    fn test_boolean_expressions() {
        let declarations = Declarations::new()
            .with_scalar("p", ValueType::Boolean)
            .with_scalar("q", ValueType::Boolean);
        let expr = compile("p and not q or false", &declarations).unwrap();
        assert_eq!(expr.value_type(), ValueType::Boolean);

        let bindings = Bindings::new().with("p", true).with("q", false);
        assert_eq!(expr.resolve(&bindings).unwrap(), Value::Boolean(true));

        let bindings = Bindings::new().with("p", true).with("q", true);
        assert_eq!(expr.resolve(&bindings).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_three_valued_logic() {
        let declarations = Declarations::new();
        let cases = [
            ("null and false", Value::Boolean(false)),
            ("null and true", Value::Null),
            ("null or true", Value::Boolean(true)),
            ("null or false", Value::Null),
            ("true xor null", Value::Null),
            ("true xor false", Value::Boolean(true)),
            ("not null", Value::Null),
        ];
        for (source, expected) in cases {
            let expr = compile(source, &declarations).unwrap();
            assert_eq!(expr.resolve(&Bindings::new()).unwrap(), expected, "{}", source);
        }
    }

    #[test]
    fn test_comparisons_feed_boolean_operators() {
        let declarations = Declarations::new().with_scalar("x", ValueType::Integer);
        let expr = compile("x > 1 and x < 10", &declarations).unwrap();
        assert_eq!(
            expr.resolve(&Bindings::new().with("x", 5i64)).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            expr.resolve(&Bindings::new().with("x", 50i64)).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_type_mismatch() {
        let declarations = Declarations::new();

        let err = compile("1 and true", &declarations).unwrap_err();
        assert!(matches!(
            err,
            CompileError::TypeMismatch { ref text, actual: ValueType::Integer, .. } if text == "1"
        ));

        let err = compile("not \"yes\"", &declarations).unwrap_err();
        match err {
            CompileError::TypeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, vec![ValueType::Boolean, ValueType::Null]);
                assert_eq!(actual, ValueType::String);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_right_operand_precedes_type_check() {
        let err = compile("1 or flag", &Declarations::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariable);
    }

    #[test]
    fn test_misrouted_unary_operator() {
        let declarations = Declarations::new();
        let compiler = ExpressionCompiler::new(&declarations);
        let span = Span::new(0, 2, 1, 1);
        let node = ParseNode::new(
            ExprContext::UnaryExpr {
                op: OpToken::new(TokenKind::Minus, "-", span),
                right: Box::new(ParseNode::new(
                    ExprContext::ConstantExpr(Literal::Boolean(true)),
                    "true",
                    span,
                )),
            },
            "-true",
            span,
        );
        let err = BooleanCompiler::new(&compiler).compile_unary(&node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
