//! Syntax errors.

use super::token::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at {span}: {message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
