//! Error types for expression compilation and resolution.

use crate::access::ValueType;
use crate::catalog::Role;
use crate::executor::JoinError;
use crate::syntax::{ParseNode, Span};
use thiserror::Error;

/// Machine-readable category of a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand type outside the accepted set for its position
    TypeMismatch,
    /// Operand kinds that cannot be reconciled for an operator
    OperatorType,
    /// Datasets without a common identifier column
    Structural,
    UnknownVariable,
    /// A compiler defect, never a user error
    Internal,
}

/// Errors raised while compiling a parse tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(
        "type mismatch at {span}: '{text}' has type {actual}, expected one of {}",
        type_list(.expected)
    )]
    TypeMismatch {
        text: String,
        span: Span,
        expected: Vec<ValueType>,
        actual: ValueType,
    },

    #[error("operator '{operator}' cannot be applied to '{left}', '{right}' at {span}")]
    OperatorType {
        operator: String,
        left: String,
        right: String,
        span: Span,
    },

    #[error("operator '{operator}' at {span} requires at least one common identifier column")]
    NoCommonIdentifiers { operator: String, span: Span },

    #[error("unknown variable '{name}' at {span}")]
    UnknownVariable { name: String, span: Span },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CompileError {
    /// Type mismatch attached to the offending sub-node
    pub fn type_mismatch(node: &ParseNode, expected: &[ValueType], actual: ValueType) -> Self {
        CompileError::TypeMismatch {
            text: node.text().to_string(),
            span: node.span(),
            expected: expected.to_vec(),
            actual,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("internal compiler error: {}", message);
        CompileError::Internal { message }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CompileError::OperatorType { .. } => ErrorKind::OperatorType,
            CompileError::NoCommonIdentifiers { .. } => ErrorKind::Structural,
            CompileError::UnknownVariable { .. } => ErrorKind::UnknownVariable,
            CompileError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Position of the offending node, when known
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::TypeMismatch { span, .. }
            | CompileError::OperatorType { span, .. }
            | CompileError::NoCommonIdentifiers { span, .. }
            | CompileError::UnknownVariable { span, .. } => Some(*span),
            CompileError::Internal { .. } => None,
        }
    }
}

/// Errors raised while resolving a compiled expression against bindings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("variable '{name}' is not bound")]
    UnboundVariable { name: String },

    #[error("variable '{name}' is declared as {expected} but bound to a {actual} value")]
    BindingTypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("dataset '{name}' is declared with {role} column '{column}' of type {value_type}, which the bound dataset lacks")]
    SchemaMismatch {
        name: String,
        column: String,
        role: Role,
        value_type: ValueType,
    },

    #[error("operator '{operator}' cannot be applied to {left} and {right} values")]
    InvalidOperands {
        operator: String,
        left: ValueType,
        right: ValueType,
    },

    #[error("operator '{operator}' cannot be applied to a {operand} value")]
    InvalidOperand { operator: String, operand: ValueType },

    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ResolveError {
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("internal resolution error: {}", message);
        ResolveError::Internal { message }
    }
}

fn type_list(types: &[ValueType]) -> String {
    types
        .iter()
        .map(ValueType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
