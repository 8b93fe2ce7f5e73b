pub mod access;
pub mod catalog;
pub mod error;
pub mod executor;
pub mod expression;
pub mod session;
pub mod syntax;

pub use access::{Bindings, Dataset, Value, ValueType};
pub use catalog::{Column, Declarations, Role, VariableType};
pub use error::{VtlError, VtlResult};
pub use executor::JoinKeyPolicy;
pub use expression::{CompileError, CompiledExpression, CompilerOptions, ExpressionCompiler, ResolveError};
pub use session::{compile, interpret, Session, StatementResult};
