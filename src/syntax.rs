// Syntax module - VTL expression parsing and parse tree representation

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod tree;

pub use error::{ParseError, ParseResult};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Span, Token, TokenKind};
pub use tree::{ExprContext, Literal, OpToken, ParseNode, Statement};

/// Parse a single expression.
pub fn parse_expression(source: &str) -> ParseResult<ParseNode> {
    Parser::new(source)?.parse_single_expression()
}

/// Parse a program of `;`-separated statements.
pub fn parse_program(source: &str) -> ParseResult<Vec<Statement>> {
    Parser::new(source)?.parse_program()
}
