//! Parse tree handed to the expression compiler.
//!
//! The shape mirrors the grammar's labelled alternatives: several
//! operators share one production (`ArithmeticExprOrConcat` holds `+`, `-`
//! and `||`; `UnaryExpr` holds `+`, `-` and `not`), and the operator token
//! embedded in the node tells them apart.

use super::token::{Span, TokenKind};

/// Constant literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// Operator token embedded in a node.
#[derive(Debug, Clone, PartialEq)]
pub struct OpToken {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl OpToken {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Grammar production of a node, with its children.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprContext {
    ParenthesisExpr(Box<ParseNode>),
    UnaryExpr {
        op: OpToken,
        right: Box<ParseNode>,
    },
    /// `*` and `/`
    ArithmeticExpr {
        left: Box<ParseNode>,
        op: OpToken,
        right: Box<ParseNode>,
    },
    /// `+`, `-` and `||`
    ArithmeticExprOrConcat {
        left: Box<ParseNode>,
        op: OpToken,
        right: Box<ParseNode>,
    },
    ComparisonExpr {
        left: Box<ParseNode>,
        op: OpToken,
        right: Box<ParseNode>,
    },
    /// `and`, `or` and `xor`
    BooleanExpr {
        left: Box<ParseNode>,
        op: OpToken,
        right: Box<ParseNode>,
    },
    VarIdExpr(String),
    ConstantExpr(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    context: ExprContext,
    text: String,
    span: Span,
}

impl ParseNode {
    pub fn new(context: ExprContext, text: impl Into<String>, span: Span) -> Self {
        Self {
            context,
            text: text.into(),
            span,
        }
    }

    pub fn context(&self) -> &ExprContext {
        &self.context
    }

    /// Source text of the node, for diagnostics.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Name of the production.
    pub fn kind(&self) -> &'static str {
        match self.context {
            ExprContext::ParenthesisExpr(_) => "parenthesisExpr",
            ExprContext::UnaryExpr { .. } => "unaryExpr",
            ExprContext::ArithmeticExpr { .. } => "arithmeticExpr",
            ExprContext::ArithmeticExprOrConcat { .. } => "arithmeticExprOrConcat",
            ExprContext::ComparisonExpr { .. } => "comparisonExpr",
            ExprContext::BooleanExpr { .. } => "booleanExpr",
            ExprContext::VarIdExpr(_) => "varIdExpr",
            ExprContext::ConstantExpr(_) => "constantExpr",
        }
    }

    /// Operands and operator of a binary production.
    pub fn binary_parts(&self) -> Option<(&ParseNode, &OpToken, &ParseNode)> {
        match &self.context {
            ExprContext::ArithmeticExpr { left, op, right }
            | ExprContext::ArithmeticExprOrConcat { left, op, right }
            | ExprContext::ComparisonExpr { left, op, right }
            | ExprContext::BooleanExpr { left, op, right } => Some((left, op, right)),
            _ => None,
        }
    }

    /// Operator of a unary or binary production.
    pub fn op(&self) -> Option<&OpToken> {
        match &self.context {
            ExprContext::UnaryExpr { op, .. } => Some(op),
            _ => self.binary_parts().map(|(_, op, _)| op),
        }
    }
}

/// `target := expression` or a bare expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub target: Option<String>,
    pub expression: ParseNode,
    pub span: Span,
}
