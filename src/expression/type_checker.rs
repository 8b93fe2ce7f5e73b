//! Type lattice and operand checks shared by the compilers.

use crate::access::ValueType;
use crate::expression::{ArithmeticOperator, CompileError, CompileResult};
use crate::syntax::ParseNode;

/// Operand types accepted by binary `+ - * /`
pub const BINARY_ARITHMETIC_TYPES: [ValueType; 5] = [
    ValueType::Integer,
    ValueType::Number,
    ValueType::Dataset,
    ValueType::Null,
    ValueType::Date,
];

/// Operand types accepted by unary `+ -`
pub const UNARY_ARITHMETIC_TYPES: [ValueType; 3] =
    [ValueType::Integer, ValueType::Number, ValueType::Null];

/// Scalar types a dataset measure may have to take part in arithmetic
pub const MEASURE_ARITHMETIC_TYPES: [ValueType; 4] = [
    ValueType::Integer,
    ValueType::Number,
    ValueType::Null,
    ValueType::Date,
];

pub const CONCATENATION_TYPES: [ValueType; 2] = [ValueType::String, ValueType::Null];

pub const BOOLEAN_TYPES: [ValueType; 2] = [ValueType::Boolean, ValueType::Null];

pub const COMPARISON_TYPES: [ValueType; 7] = ValueType::SCALARS;

/// Result type of an arithmetic expression over `operand_types`.
///
/// `NULL` wins over `DATE`, which wins over `NUMBER`; otherwise `INTEGER`.
pub fn result_type(operand_types: &[ValueType]) -> ValueType {
    if operand_types.contains(&ValueType::Null) {
        ValueType::Number
    } else if operand_types.contains(&ValueType::Date) {
        ValueType::Integer
    } else if operand_types.contains(&ValueType::Number) {
        ValueType::Number
    } else {
        ValueType::Integer
    }
}

/// Like [`result_type`], except that division always yields `NUMBER`.
pub fn arithmetic_result_type(op: ArithmeticOperator, operand_types: &[ValueType]) -> ValueType {
    match op {
        ArithmeticOperator::Div => ValueType::Number,
        _ => result_type(operand_types),
    }
}

/// Check if two static types may be compared with each other
pub fn comparable(left: ValueType, right: ValueType) -> bool {
    left == right
        || (left.is_numeric() && right.is_numeric())
        || left == ValueType::Null
        || right == ValueType::Null
}

/// Fail with a type mismatch on `node` unless `actual` is accepted.
pub fn check_operand(
    node: &ParseNode,
    actual: ValueType,
    accepted: &[ValueType],
) -> CompileResult<()> {
    if accepted.contains(&actual) {
        Ok(())
    } else {
        Err(CompileError::type_mismatch(node, accepted, actual))
    }
}
