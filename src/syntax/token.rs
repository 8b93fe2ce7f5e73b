// VTL tokens for lexical analysis

use std::fmt;

/// Location of a token or node in the source text.
///
/// `start`/`end` are byte offsets (end exclusive); `line` and `column` are
/// 1-based and refer to `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering `self` through `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            end: other.end,
            ..self
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Closed vocabulary of token tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Identifier,
    IntegerConstant,
    NumberConstant,
    StringConstant,
    True,
    False,
    Null,

    // Operators
    Plus,
    Minus,
    Mul,
    Div,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
    Not,
    Assign,

    // Delimiters
    LeftParen,
    RightParen,
    Semicolon,

    Eof,
}

impl TokenKind {
    /// Keywords are case-insensitive.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s.to_lowercase().as_str() {
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "xor" => Some(TokenKind::Xor),
            "not" => Some(TokenKind::Not),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "null" => Some(TokenKind::Null),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Xor
                | TokenKind::Not
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Human readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerConstant => "integer constant",
            TokenKind::NumberConstant => "number constant",
            TokenKind::StringConstant => "string constant",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Concat => "'||'",
            TokenKind::Eq => "'='",
            TokenKind::Ne => "'<>'",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Xor => "'xor'",
            TokenKind::Not => "'not'",
            TokenKind::Assign => "':='",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text, except for string constants where it is the unquoted
    /// contents.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(TokenKind::keyword_from_str("and"), Some(TokenKind::And));
        assert_eq!(TokenKind::keyword_from_str("NOT"), Some(TokenKind::Not));
        assert_eq!(TokenKind::keyword_from_str("Null"), Some(TokenKind::Null));
        assert_eq!(TokenKind::keyword_from_str("ds_1"), None);
        assert!(TokenKind::Xor.is_keyword());
        assert!(!TokenKind::Plus.is_keyword());
    }

    #[test]
    fn test_span_merge() {
        let left = Span::new(0, 1, 1, 1);
        let right = Span::new(4, 5, 1, 5);
        assert_eq!(left.to(right), Span::new(0, 5, 1, 1));
        assert_eq!(left.to_string(), "line 1, column 1");
    }
}
