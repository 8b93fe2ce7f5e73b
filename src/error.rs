//! Top-level error of the interpreter entry points.

use crate::expression::{CompileError, ResolveError};
use crate::syntax::ParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VtlError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

pub type VtlResult<T> = Result<T, VtlError>;
