// VTL parser - converts tokens to a parse tree

use super::error::{ParseError, ParseResult};
use super::lexer::Lexer;
use super::token::{Span, Token, TokenKind};
use super::tree::{ExprContext, Literal, OpToken, ParseNode, Statement};

type BinaryContext = fn(Box<ParseNode>, OpToken, Box<ParseNode>) -> ExprContext;

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Parser {
            source,
            tokens,
            position: 0,
        })
    }

    /// Parse a single expression spanning the whole input
    pub fn parse_single_expression(&mut self) -> ParseResult<ParseNode> {
        let expression = self.parse_expression()?;
        self.expect_token(TokenKind::Eof)?;
        Ok(expression)
    }

    /// Parse `;`-separated statements. The final `;` is optional.
    pub fn parse_program(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = vec![];

        loop {
            while self.match_token(TokenKind::Semicolon) {
                self.advance();
            }
            if self.match_token(TokenKind::Eof) {
                break;
            }

            statements.push(self.parse_statement()?);

            if !self.match_token(TokenKind::Eof) {
                self.expect_token(TokenKind::Semicolon)?;
            }
        }

        Ok(statements)
    }

    /// Parse `name := expr` or a bare expression
    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let start = self.current_token().span;

        let target = if self.match_token(TokenKind::Identifier)
            && self.peek_token().kind == TokenKind::Assign
        {
            let name = self.current_token().text.clone();
            self.advance();
            self.advance();
            Some(name)
        } else {
            None
        };

        let expression = self.parse_expression()?;
        let span = start.to(expression.span());
        Ok(Statement {
            target,
            expression,
            span,
        })
    }

    /// Parse expression
    fn parse_expression(&mut self) -> ParseResult<ParseNode> {
        self.parse_or()
    }

    /// Parse OR / XOR expression
    fn parse_or(&mut self) -> ParseResult<ParseNode> {
        let mut left = self.parse_and()?;

        while self.match_any(&[TokenKind::Or, TokenKind::Xor]) {
            let op = self.take_op();
            let right = self.parse_and()?;
            left = self.binary(left, op, right, boolean_context);
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> ParseResult<ParseNode> {
        let mut left = self.parse_comparison()?;

        while self.match_token(TokenKind::And) {
            let op = self.take_op();
            let right = self.parse_comparison()?;
            left = self.binary(left, op, right, boolean_context);
        }

        Ok(left)
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> ParseResult<ParseNode> {
        let mut left = self.parse_additive()?;

        while self.match_any(&[
            TokenKind::Eq,
            TokenKind::Ne,
            TokenKind::Lt,
            TokenKind::Le,
            TokenKind::Gt,
            TokenKind::Ge,
        ]) {
            let op = self.take_op();
            let right = self.parse_additive()?;
            left = self.binary(left, op, right, |left, op, right| {
                ExprContext::ComparisonExpr { left, op, right }
            });
        }

        Ok(left)
    }

    /// Parse addition/subtraction/concatenation expression
    fn parse_additive(&mut self) -> ParseResult<ParseNode> {
        let mut left = self.parse_multiplicative()?;

        while self.match_any(&[TokenKind::Plus, TokenKind::Minus, TokenKind::Concat]) {
            let op = self.take_op();
            let right = self.parse_multiplicative()?;
            left = self.binary(left, op, right, |left, op, right| {
                ExprContext::ArithmeticExprOrConcat { left, op, right }
            });
        }

        Ok(left)
    }

    /// Parse multiplication/division expression
    fn parse_multiplicative(&mut self) -> ParseResult<ParseNode> {
        let mut left = self.parse_unary()?;

        while self.match_any(&[TokenKind::Mul, TokenKind::Div]) {
            let op = self.take_op();
            let right = self.parse_unary()?;
            left = self.binary(left, op, right, |left, op, right| {
                ExprContext::ArithmeticExpr { left, op, right }
            });
        }

        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary(&mut self) -> ParseResult<ParseNode> {
        if self.match_any(&[TokenKind::Plus, TokenKind::Minus, TokenKind::Not]) {
            let op = self.take_op();
            let right = self.parse_unary()?;
            let span = op.span.to(right.span());
            return Ok(self.node(
                ExprContext::UnaryExpr {
                    op,
                    right: Box::new(right),
                },
                span,
            ));
        }
        self.parse_primary()
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> ParseResult<ParseNode> {
        let token = self.current_token().clone();
        let context = match token.kind {
            TokenKind::IntegerConstant => {
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::new(format!("integer out of range: {}", token.text), token.span))?;
                ExprContext::ConstantExpr(Literal::Integer(value))
            }
            TokenKind::NumberConstant => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ParseError::new(format!("invalid number: {}", token.text), token.span))?;
                ExprContext::ConstantExpr(Literal::Number(value))
            }
            TokenKind::StringConstant => ExprContext::ConstantExpr(Literal::String(token.text.clone())),
            TokenKind::True => ExprContext::ConstantExpr(Literal::Boolean(true)),
            TokenKind::False => ExprContext::ConstantExpr(Literal::Boolean(false)),
            TokenKind::Null => ExprContext::ConstantExpr(Literal::Null),
            TokenKind::Identifier => ExprContext::VarIdExpr(token.text.clone()),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let close = self.current_token().span;
                self.expect_token(TokenKind::RightParen)?;
                let span = token.span.to(close);
                return Ok(self.node(ExprContext::ParenthesisExpr(Box::new(inner)), span));
            }
            other => {
                return Err(ParseError::new(
                    format!("expected expression, found {}", other.describe()),
                    token.span,
                ))
            }
        };

        self.advance();
        Ok(self.node(context, token.span))
    }

    // Helper methods

    fn node(&self, context: ExprContext, span: Span) -> ParseNode {
        let text = self.source.get(span.start..span.end).unwrap_or_default();
        ParseNode::new(context, text, span)
    }

    fn binary(&self, left: ParseNode, op: OpToken, right: ParseNode, make: BinaryContext) -> ParseNode {
        let span = left.span().to(right.span());
        self.node(make(Box::new(left), op, Box::new(right)), span)
    }

    /// Consume the current token as an operator
    fn take_op(&mut self) -> OpToken {
        let token = self.current_token().clone();
        self.advance();
        OpToken::new(token.kind, token.text, token.span)
    }

    /// Get current token
    fn current_token(&self) -> &Token {
        // The token list always ends with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek_token(&self) -> &Token {
        &self.tokens[(self.position + 1).min(self.tokens.len() - 1)]
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, kind: TokenKind) -> bool {
        self.current_token().kind == kind
    }

    fn match_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_token().kind)
    }

    /// Expect a specific token
    fn expect_token(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.match_token(kind) {
            self.advance();
            Ok(())
        } else {
            let found = self.current_token();
            Err(ParseError::new(
                format!("expected {}, found {}", kind.describe(), found.kind.describe()),
                found.span,
            ))
        }
    }
}

fn boolean_context(left: Box<ParseNode>, op: OpToken, right: Box<ParseNode>) -> ExprContext {
    ExprContext::BooleanExpr { left, op, right }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseNode {
        Parser::new(source).unwrap().parse_single_expression().unwrap()
    }

    #[test]
    fn test_precedence() {
        let node = parse("1 + 2 * 3");
        let ExprContext::ArithmeticExprOrConcat { left, op, right } = node.context() else {
            panic!("expected arithmeticExprOrConcat, got {}", node.kind());
        };
        assert_eq!(op.kind, TokenKind::Plus);
        assert_eq!(left.context(), &ExprContext::ConstantExpr(Literal::Integer(1)));
        assert_eq!(right.kind(), "arithmeticExpr");
        assert_eq!(right.text(), "2 * 3");
    }

    #[test]
    fn test_left_associativity() {
        let node = parse("a - b - c");
        let (left, _, right) = node.binary_parts().unwrap();
        assert_eq!(left.text(), "a - b");
        assert_eq!(right.text(), "c");
    }

    #[test]
    fn test_merged_productions_keep_operator_tag() {
        let node = parse(r#""a" || "b""#);
        assert_eq!(node.kind(), "arithmeticExprOrConcat");
        assert_eq!(node.op().unwrap().kind, TokenKind::Concat);

        let node = parse("not true");
        assert_eq!(node.kind(), "unaryExpr");
        assert_eq!(node.op().unwrap().kind, TokenKind::Not);

        let node = parse("-x");
        assert_eq!(node.op().unwrap().kind, TokenKind::Minus);
    }

    #[test]
    fn test_boolean_and_comparison_levels() {
        let node = parse("a < 1 and b = 2 or c");
        assert_eq!(node.kind(), "booleanExpr");
        assert_eq!(node.op().unwrap().kind, TokenKind::Or);
        let (left, _, _) = node.binary_parts().unwrap();
        assert_eq!(left.op().unwrap().kind, TokenKind::And);
        let (cmp, _, _) = left.binary_parts().unwrap();
        assert_eq!(cmp.kind(), "comparisonExpr");
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("42").context(), &ExprContext::ConstantExpr(Literal::Integer(42)));
        assert_eq!(parse("4.5").context(), &ExprContext::ConstantExpr(Literal::Number(4.5)));
        assert_eq!(
            parse(r#""text""#).context(),
            &ExprContext::ConstantExpr(Literal::String("text".to_string()))
        );
        assert_eq!(parse("null").context(), &ExprContext::ConstantExpr(Literal::Null));
        assert_eq!(parse("false").context(), &ExprContext::ConstantExpr(Literal::Boolean(false)));
    }

    #[test]
    fn test_parenthesis_and_spans() {
        let node = parse("(x + 1) * 2");
        let (left, _, _) = node.binary_parts().unwrap();
        assert_eq!(left.kind(), "parenthesisExpr");
        assert_eq!(left.text(), "(x + 1)");
        assert_eq!(left.span(), Span::new(0, 7, 1, 1));
        assert_eq!(node.text(), "(x + 1) * 2");
    }

    #[test]
    fn test_program() {
        let statements = Parser::new("a := 1 + 2;\n b := a * 3;; a")
            .unwrap()
            .parse_program()
            .unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].target.as_deref(), Some("a"));
        assert_eq!(statements[0].expression.text(), "1 + 2");
        assert_eq!(statements[1].target.as_deref(), Some("b"));
        assert_eq!(statements[1].span.line, 2);
        assert_eq!(statements[2].target, None);
    }

    #[test]
    fn test_syntax_errors() {
        let err = Parser::new("1 +").unwrap().parse_single_expression().unwrap_err();
        assert_eq!(err.message, "expected expression, found end of input");
        assert_eq!(err.span.column, 4);

        let err = Parser::new("(1").unwrap().parse_single_expression().unwrap_err();
        assert!(err.message.contains("')'"));

        assert!(Parser::new("1 2").unwrap().parse_single_expression().is_err());
        assert!(Parser::new("a := 1 b := 2").unwrap().parse_program().is_err());
        assert!(Parser::new("99999999999999999999").unwrap().parse_single_expression().is_err());
    }
}
