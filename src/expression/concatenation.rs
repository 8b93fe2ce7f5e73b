//! Concatenation compiler: `||`.

use crate::access::ValueType;
use crate::expression::type_checker::{check_operand, CONCATENATION_TYPES};
use crate::expression::{CompileError, CompileResult, CompiledExpression, ExpressionCompiler, Node};
use crate::syntax::{ExprContext, ParseNode, TokenKind};

pub struct ConcatenationCompiler<'c, 'a> {
    compiler: &'c ExpressionCompiler<'a>,
}

impl<'c, 'a> ConcatenationCompiler<'c, 'a> {
    pub fn new(compiler: &'c ExpressionCompiler<'a>) -> Self {
        Self { compiler }
    }

    pub fn compile(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let ExprContext::ArithmeticExprOrConcat { left, op, right } = node.context() else {
            return Err(CompileError::internal(format!(
                "concatenation compiler received a {} node",
                node.kind()
            )));
        };
        if op.kind != TokenKind::Concat {
            return Err(CompileError::internal(format!(
                "concatenation compiler received operator '{}'",
                op.text
            )));
        }

        let left_expr = self.compiler.compile(left)?;
        let right_expr = self.compiler.compile(right)?;
        check_operand(left, left_expr.value_type(), &CONCATENATION_TYPES)?;
        check_operand(right, right_expr.value_type(), &CONCATENATION_TYPES)?;

        Ok(CompiledExpression::scalar(
            ValueType::String,
            Node::Concatenation {
                left: Box::new(left_expr),
                right: Box::new(right_expr),
            },
        ))
    }
}
