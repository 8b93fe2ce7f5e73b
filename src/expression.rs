//! Expression compilation and resolution.
//!
//! This module provides:
//! - Routing of parse tree productions to per-operator compilers
//! - Static type checking against the type lattice
//! - Compiled expression trees, resolved later against bindings
//! - Broadcasting of arithmetic over datasets

pub mod arithmetic;
pub mod boolean;
pub mod comparison;
pub mod compiler;
pub mod concatenation;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod type_checker;

pub use arithmetic::ArithmeticCompiler;
pub use boolean::BooleanCompiler;
pub use comparison::ComparisonCompiler;
pub use compiler::{CompilerOptions, ExpressionCompiler};
pub use concatenation::ConcatenationCompiler;
pub use error::{CompileError, CompileResult, ErrorKind, ResolveError, ResolveResult};
pub use eval::ExpressionEvaluator;
pub use expr::{CompiledExpression, Node};
pub use operator::{ArithmeticOperator, BooleanOperator, ComparisonOperator, UnaryOperator};
pub use type_checker::{arithmetic_result_type, result_type};
