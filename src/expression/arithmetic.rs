//! Arithmetic compiler: binary `+ - * /` and unary `+ -`.
//!
//! Two scalar operands compile to a [`Node::Arithmetic`]; two datasets
//! compile to a join over their common identifiers. A scalar next to a
//! dataset is rejected, except for `null`, which stays a wildcard and takes
//! the scalar path.

use crate::access::ValueType;
use crate::catalog::{Column, CommonColumns, Role};
use crate::executor::JoinSpec;
use crate::expression::type_checker::{
    arithmetic_result_type, check_operand, result_type, BINARY_ARITHMETIC_TYPES,
    MEASURE_ARITHMETIC_TYPES, UNARY_ARITHMETIC_TYPES,
};
use crate::expression::{
    ArithmeticOperator, CompileError, CompileResult, CompiledExpression, ExpressionCompiler, Node,
    UnaryOperator,
};
use crate::syntax::{ExprContext, OpToken, ParseNode};
use log::warn;

pub struct ArithmeticCompiler<'c, 'a> {
    compiler: &'c ExpressionCompiler<'a>,
}

impl<'c, 'a> ArithmeticCompiler<'c, 'a> {
    pub fn new(compiler: &'c ExpressionCompiler<'a>) -> Self {
        Self { compiler }
    }

    /// Compile `left op right` for `op` in `+ - * /`
    pub fn compile_binary(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let (left_node, op_token, right_node) = match node.context() {
            ExprContext::ArithmeticExpr { left, op, right }
            | ExprContext::ArithmeticExprOrConcat { left, op, right } => (left, op, right),
            _ => {
                return Err(CompileError::internal(format!(
                    "arithmetic compiler received a {} node",
                    node.kind()
                )))
            }
        };
        let op = ArithmeticOperator::from_token(op_token.kind).ok_or_else(|| {
            CompileError::internal(format!(
                "arithmetic compiler received operator '{}'",
                op_token.text
            ))
        })?;

        let left = self.compiler.compile(left_node)?;
        let right = self.compiler.compile(right_node)?;
        check_operand(left_node, left.value_type(), &BINARY_ARITHMETIC_TYPES)?;
        check_operand(right_node, right.value_type(), &BINARY_ARITHMETIC_TYPES)?;

        match (left.value_type(), right.value_type()) {
            (ValueType::Dataset, ValueType::Dataset) => {
                self.compile_dataset(node, op, op_token, left, right)
            }
            (ValueType::Dataset, ValueType::Null) | (ValueType::Null, ValueType::Dataset) => {
                Ok(compile_scalar(op, left, right))
            }
            (ValueType::Dataset, actual) => Err(CompileError::type_mismatch(
                right_node,
                &[ValueType::Dataset],
                actual,
            )),
            (actual, ValueType::Dataset) => Err(CompileError::type_mismatch(
                left_node,
                &[ValueType::Dataset],
                actual,
            )),
            _ => Ok(compile_scalar(op, left, right)),
        }
    }

    /// Compile `+operand` or `-operand`
    pub fn compile_unary(&self, node: &ParseNode) -> CompileResult<CompiledExpression> {
        let ExprContext::UnaryExpr { op, right } = node.context() else {
            return Err(CompileError::internal(format!(
                "arithmetic compiler received a {} node",
                node.kind()
            )));
        };
        let op = match UnaryOperator::from_token(op.kind) {
            Some(op @ (UnaryOperator::Plus | UnaryOperator::Minus)) => op,
            _ => {
                return Err(CompileError::internal(format!(
                    "arithmetic compiler received unary operator '{}'",
                    op.text
                )))
            }
        };

        let operand = self.compiler.compile(right)?;
        check_operand(right, operand.value_type(), &UNARY_ARITHMETIC_TYPES)?;

        Ok(CompiledExpression::scalar(
            result_type(&[operand.value_type()]),
            Node::Unary {
                op,
                operand: Box::new(operand),
            },
        ))
    }

    /// Broadcast `op` over two datasets joined on their common identifiers.
    ///
    /// The declared schema is the left operand's, while resolved datasets
    /// only hold the common identifiers and measures. A later join keyed on
    /// a left-only identifier therefore finds no matches.
    fn compile_dataset(
        &self,
        node: &ParseNode,
        op: ArithmeticOperator,
        op_token: &OpToken,
        left: CompiledExpression,
        right: CompiledExpression,
    ) -> CompileResult<CompiledExpression> {
        let (left_columns, right_columns) = match (left.columns(), right.columns()) {
            (Some(l), Some(r)) => (l.to_vec(), r),
            _ => {
                return Err(CompileError::internal(format!(
                    "dataset operand of '{}' has no schema",
                    node.text()
                )))
            }
        };

        let common = CommonColumns::between(&left_columns, right_columns);
        if common.identifiers.is_empty() {
            return Err(CompileError::NoCommonIdentifiers {
                operator: op.as_str().to_string(),
                span: node.span(),
            });
        }

        let uncarried: Vec<&str> = left_columns
            .iter()
            .filter(|c| c.role == Role::Identifier && !common.identifiers.contains(c))
            .map(|c| c.name.as_str())
            .collect();
        if !uncarried.is_empty() {
            warn!(
                "'{}' declares identifier(s) {} that its joined rows do not carry",
                node.text(),
                uncarried.join(", ")
            );
        }

        let measures = common
            .measures
            .into_iter()
            .map(|measure| {
                if !MEASURE_ARITHMETIC_TYPES.contains(&measure.value_type) {
                    let described = format!("{} {}", measure.name, measure.value_type);
                    return Err(CompileError::OperatorType {
                        operator: op.as_str().to_string(),
                        left: described.clone(),
                        right: described,
                        span: op_token.span,
                    });
                }
                let value_type =
                    arithmetic_result_type(op, &[measure.value_type, measure.value_type]);
                Ok(Column::new(measure.name, measure.role, value_type))
            })
            .collect::<CompileResult<Vec<_>>>()?;

        let join = JoinSpec::new(
            common.identifiers,
            measures,
            self.compiler.options().join_key_policy,
        )
        .map_err(|e| CompileError::internal(e.to_string()))?;

        Ok(CompiledExpression::dataset(
            left_columns,
            Node::DatasetArithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
                join,
            },
        ))
    }
}

fn compile_scalar(
    op: ArithmeticOperator,
    left: CompiledExpression,
    right: CompiledExpression,
) -> CompiledExpression {
    CompiledExpression::scalar(
        arithmetic_result_type(op, &[left.value_type(), right.value_type()]),
        Node::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    )
}
