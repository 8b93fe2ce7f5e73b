//! Statement execution against a shared binding environment.

use crate::access::{Bindings, Value};
use crate::catalog::Declarations;
use crate::error::VtlResult;
use crate::expression::{CompiledExpression, CompilerOptions, ExpressionCompiler};
use crate::syntax::{self, ParseNode};
use log::{debug, info};
use parking_lot::RwLock;
use serde::Serialize;

/// Runs programs, binding each assigned result for the statements after it.
///
/// A session may be shared between threads. Resolution holds a read guard
/// on the bindings; storing a result takes the write guard afterwards.
#[derive(Debug, Default)]
pub struct Session {
    bindings: RwLock<Bindings>,
    options: CompilerOptions,
}

/// Outcome of one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementResult {
    /// `name := expression`
    Assigned { name: String, value: Value },
    /// A bare expression
    Evaluated { value: Value },
}

impl StatementResult {
    pub fn value(&self) -> &Value {
        match self {
            StatementResult::Assigned { value, .. } | StatementResult::Evaluated { value } => value,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Self {
            bindings: RwLock::new(Bindings::new()),
            options,
        }
    }

    /// Replace the session's bindings
    pub fn with_bindings(self, bindings: Bindings) -> Self {
        *self.bindings.write() = bindings;
        self
    }

    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    pub fn bind(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.write().insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.read().get(name).cloned()
    }

    /// Snapshot of the current bindings
    pub fn bindings(&self) -> Bindings {
        self.bindings.read().clone()
    }

    /// Evaluate a single expression without binding its result
    pub fn evaluate(&self, source: &str) -> VtlResult<Value> {
        let node = syntax::parse_expression(source)?;
        self.run(&node)
    }

    /// Execute a program of `;`-separated statements.
    ///
    /// Stops at the first failing statement; results of the statements
    /// before it stay bound.
    pub fn execute(&self, source: &str) -> VtlResult<Vec<StatementResult>> {
        let statements = syntax::parse_program(source)?;
        info!("Executing {} statement(s)", statements.len());

        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            debug!("Executing statement at {}", statement.span);
            let value = self.run(&statement.expression)?;
            let result = match statement.target {
                Some(name) => {
                    self.bindings.write().insert(name.clone(), value.clone());
                    StatementResult::Assigned { name, value }
                }
                None => StatementResult::Evaluated { value },
            };
            results.push(result);
        }
        Ok(results)
    }

    fn run(&self, node: &ParseNode) -> VtlResult<Value> {
        let bindings = self.bindings.read();
        let declarations = Declarations::infer(&bindings);
        let compiled =
            ExpressionCompiler::with_options(&declarations, self.options).compile(node)?;
        Ok(compiled.resolve(&bindings)?)
    }
}

/// Parse and compile `source` against `declarations`
pub fn compile(source: &str, declarations: &Declarations) -> VtlResult<CompiledExpression> {
    let node = syntax::parse_expression(source)?;
    Ok(ExpressionCompiler::new(declarations).compile(&node)?)
}

/// Evaluate a single expression; declarations are inferred from `bindings`
pub fn interpret(source: &str, bindings: &Bindings) -> VtlResult<Value> {
    let declarations = Declarations::infer(bindings);
    Ok(compile(source, &declarations)?.resolve(bindings)?)
}
