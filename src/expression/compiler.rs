//! Entry point of compilation: routes each production to its compiler.
//!
//! Several operators share one production (`+`, `-` and `||` are all
//! `ArithmeticExprOrConcat`, `not` is a `UnaryExpr` like `-`), so routing
//! looks at the embedded operator token. Routing performs no type checks;
//! the specialized compilers do.

use crate::access::{Value, ValueType};
use crate::catalog::{Declarations, VariableType};
use crate::executor::JoinKeyPolicy;
use crate::expression::{
    ArithmeticCompiler, BooleanCompiler, CompileError, CompileResult, CompiledExpression,
    ComparisonCompiler, ConcatenationCompiler, Node,
};
use crate::syntax::{ExprContext, Literal, ParseNode, TokenKind};
use log::debug;

/// Settings that change how expressions are compiled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Row key construction for dataset joins
    pub join_key_policy: JoinKeyPolicy,
}

/// Compiles parse trees into [`CompiledExpression`]s.
///
/// Specialized compilers borrow the compiler to recurse into operands.
pub struct ExpressionCompiler<'a> {
    declarations: &'a Declarations,
    options: CompilerOptions,
}

impl<'a> ExpressionCompiler<'a> {
    pub fn new(declarations: &'a Declarations) -> Self {
        Self::with_options(declarations, CompilerOptions::default())
    }

    pub fn with_options(declarations: &'a Declarations, options: CompilerOptions) -> Self {
        Self {
            declarations,
            options,
        }
    }

    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    pub fn declarations(&self) -> &Declarations {
        self.declarations
    }

    /// Type-check `node` and build its compiled expression
    pub fn compile(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let compiled = match node.context() {
            ExprContext::ParenthesisExpr(inner) => return self.compile(inner),

            ExprContext::UnaryExpr { op, .. } => match op.kind {
                TokenKind::Not => BooleanCompiler::new(self).compile_unary(node)?,
                _ => ArithmeticCompiler::new(self).compile_unary(node)?,
            },

            ExprContext::ArithmeticExpr { .. } => ArithmeticCompiler::new(self).compile_binary(node)?,

            ExprContext::ArithmeticExprOrConcat { op, .. } => match op.kind {
                TokenKind::Concat => ConcatenationCompiler::new(self).compile(node)?,
                _ => ArithmeticCompiler::new(self).compile_binary(node)?,
            },

            ExprContext::ComparisonExpr { .. } => ComparisonCompiler::new(self).compile(node)?,

            ExprContext::BooleanExpr { .. } => BooleanCompiler::new(self).compile_binary(node)?,

            ExprContext::VarIdExpr(name) => self.compile_variable(node, name)?,

            ExprContext::ConstantExpr(literal) => compile_constant(literal),
        };

        debug!(
            "compiled {} '{}' as {}",
            node.kind(),
            node.text(),
            compiled.value_type()
        );
        Ok(compiled)
    }

    fn compile_variable(&self, node: &ParseNode, name: &str) -> CompileResult<CompiledExpression> {
        let variable_type = self
            .declarations
            .get(name)
            .ok_or_else(|| CompileError::UnknownVariable {
                name: name.to_string(),
                span: node.span(),
            })?;

        let compiled = match variable_type {
            VariableType::Scalar(value_type) => CompiledExpression::scalar(
                *value_type,
                Node::Variable {
                    name: name.to_string(),
                    declared: *value_type,
                },
            ),
            VariableType::Dataset(columns) => CompiledExpression::dataset(
                columns.clone(),
                Node::Variable {
                    name: name.to_string(),
                    declared: ValueType::Dataset,
                },
            ),
        };
        Ok(compiled)
    }
}

fn compile_constant(literal: &Literal) -> CompiledExpression {
    let value = match literal {
        Literal::Integer(i) => Value::Integer(*i),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
    };
    CompiledExpression::scalar(value.value_type(), Node::Constant(value))
}
