// VTL lexer - tokenizes expressions and statements

use super::error::{ParseError, ParseResult};
use super::token::{Span, Token, TokenKind};

pub struct Lexer {
    source: String,
    input: Vec<char>,
    position: usize,
    /// Byte offset of `current_char`
    offset: usize,
    line: usize,
    column: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let source = input.to_string();
        let input: Vec<char> = input.chars().collect();
        let current_char = input.first().copied();
        Lexer {
            source,
            input,
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            current_char,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_trivia()?;

        let (start, line, column) = (self.offset, self.line, self.column);
        let Some(ch) = self.current_char else {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::new(start, start, line, column),
            ));
        };

        let kind = match ch {
            '+' => {
                self.advance();
                TokenKind::Plus
            }
            '-' => {
                self.advance();
                TokenKind::Minus
            }
            '*' => {
                self.advance();
                TokenKind::Mul
            }
            '/' => {
                self.advance();
                TokenKind::Div
            }
            '|' => {
                self.advance();
                if self.current_char != Some('|') {
                    return Err(self.error_at("expected '||'", start, line, column));
                }
                self.advance();
                TokenKind::Concat
            }
            '=' => {
                self.advance();
                TokenKind::Eq
            }
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else if self.current_char == Some('>') {
                    self.advance();
                    TokenKind::Ne
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            ':' => {
                self.advance();
                if self.current_char != Some('=') {
                    return Err(self.error_at("expected ':='", start, line, column));
                }
                self.advance();
                TokenKind::Assign
            }
            '(' => {
                self.advance();
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                TokenKind::RightParen
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '"' => return self.read_string(start, line, column),
            '\'' => return self.read_quoted_identifier(start, line, column),
            c if c.is_alphabetic() || c == '_' => return Ok(self.read_identifier(start, line, column)),
            c if c.is_ascii_digit() => return Ok(self.read_number(start, line, column)),
            other => {
                return Err(self.error_at(
                    format!("unexpected character '{}'", other),
                    start,
                    line,
                    column,
                ))
            }
        };

        Ok(self.token(kind, start, line, column))
    }

    /// Tokenize the entire input, ending with an `Eof` token
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Advance to the next character
    fn advance(&mut self) {
        if let Some(ch) = self.current_char {
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn token(&self, kind: TokenKind, start: usize, line: usize, column: usize) -> Token {
        let text = self.slice_from(start);
        Token::new(kind, text, Span::new(start, self.offset, line, column))
    }

    fn slice_from(&self, start: usize) -> String {
        self.source[start..self.offset].to_string()
    }

    fn error_at(&self, message: impl Into<String>, start: usize, line: usize, column: usize) -> ParseError {
        ParseError::new(message, Span::new(start, self.offset, line, column))
    }

    /// Skip whitespace, `//` line comments and `/* */` block comments
    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match (self.current_char, self.peek()) {
                (Some(ch), _) if ch.is_whitespace() => self.advance(),
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.current_char {
                        self.advance();
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let (start, line, column) = (self.offset, self.line, self.column);
                    self.advance();
                    self.advance();
                    loop {
                        match (self.current_char, self.peek()) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => self.advance(),
                            (None, _) => {
                                return Err(self.error_at("unterminated comment", start, line, column))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self, start: usize, line: usize, column: usize) -> Token {
        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.slice_from(start);
        let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, Span::new(start, self.offset, line, column))
    }

    /// Read a quoted identifier (e.g., 'my variable')
    fn read_quoted_identifier(&mut self, start: usize, line: usize, column: usize) -> ParseResult<Token> {
        self.advance(); // Skip opening quote
        let mut identifier = String::new();

        loop {
            match self.current_char {
                Some('\'') => {
                    self.advance(); // Skip closing quote
                    break;
                }
                Some(ch) => {
                    identifier.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unterminated quoted identifier", start, line, column)),
            }
        }

        Ok(Token::new(
            TokenKind::Identifier,
            identifier,
            Span::new(start, self.offset, line, column),
        ))
    }

    /// Read a string constant; `""` inside the quotes is an escaped quote
    fn read_string(&mut self, start: usize, line: usize, column: usize) -> ParseResult<Token> {
        self.advance(); // Skip opening quote
        let mut string = String::new();

        loop {
            match self.current_char {
                Some('"') if self.peek() == Some('"') => {
                    string.push('"');
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance(); // Skip closing quote
                    break;
                }
                Some(ch) => {
                    string.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unterminated string constant", start, line, column)),
            }
        }

        Ok(Token::new(
            TokenKind::StringConstant,
            string,
            Span::new(start, self.offset, line, column),
        ))
    }

    /// Read an integer or number constant
    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Token {
        let mut has_dot = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let kind = if has_dot {
            TokenKind::NumberConstant
        } else {
            TokenKind::IntegerConstant
        };
        self.token(kind, start, line, column)
    }
}
