use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Token;

/// Integer, decimal, or exponent literal. A leading sign is a separate token.
static NUMBER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("numeric literal pattern is valid")
});

/// Location in the query text. Lines and columns start at 1; `offset` is a
/// byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while splitting query text into tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { ch: char, position: Position },
    UnterminatedString { position: Position },
    InvalidEscape { sequence: String, position: Position },
    UnexpectedEof { position: Position },
    MalformedNumber { text: String, position: Position },
    /// Literal too large to be represented, even as a double
    NumberOutOfRange { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::UnexpectedEof { position }
            | LexError::MalformedNumber { position, .. }
            | LexError::NumberOutOfRange { position, .. } => *position,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter { ch, position } => {
                write!(f, "Unexpected character '{}' at {}", ch, position)
            }
            LexError::UnterminatedString { position } => {
                write!(f, "Unterminated string starting at {}", position)
            }
            LexError::InvalidEscape { sequence, position } => {
                write!(f, "Invalid escape sequence '{}' at {}", sequence, position)
            }
            LexError::UnexpectedEof { position } => {
                write!(f, "Unexpected end of input at {}", position)
            }
            LexError::MalformedNumber { text, position } => {
                write!(f, "Malformed number '{}' at {}", text, position)
            }
            LexError::NumberOutOfRange { text, position } => {
                write!(f, "Number '{}' at {} is out of range", text, position)
            }
        }
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: String,
    position: Position,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.to_string(),
            position: Position::start(),
            token_start: Position::start(),
        }
    }

    /// Where the token most recently returned by [`Lexer::next_token`] begins.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    fn rest(&self) -> &str {
        &self.input[self.position.offset..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position.offset += ch.len_utf8();
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_parameter(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.advance(); // Consume '@'

        match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let name = self.read_identifier();
                Ok(Token::Parameter(format!("@{}", name)))
            }
            _ => Err(LexError::UnexpectedCharacter { ch: '@', position: start }),
        }
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_start = self.position;
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('b') => result.push('\u{8}'),
                        Some('f') => result.push('\u{c}'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some('/') => result.push('/'),
                        Some('u') => {
                            self.advance();
                            result.push(self.read_unicode_escape(escape_start)?);
                            continue;
                        }
                        Some(other) => {
                            return Err(LexError::InvalidEscape {
                                sequence: format!("\\{}", other),
                                position: escape_start,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// Reads the digits of `\uXXXX`, joining surrogate pairs.
    fn read_unicode_escape(&mut self, escape_start: Position) -> Result<char, LexError> {
        let high = self.read_hex4(escape_start)?;

        let code = if (0xD800..0xDC00).contains(&high) {
            if self.current_char() != Some('\\') || self.peek_char(1) != Some('u') {
                return Err(self.invalid_escape(escape_start));
            }
            self.advance();
            self.advance();
            let low = self.read_hex4(escape_start)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.invalid_escape(escape_start));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code).ok_or_else(|| self.invalid_escape(escape_start))
    }

    fn read_hex4(&mut self, escape_start: Position) -> Result<u32, LexError> {
        let mut value = 0;
        for _ in 0..4 {
            match self.current_char().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    value = value * 16 + digit;
                    self.advance();
                }
                None => return Err(self.invalid_escape(escape_start)),
            }
        }
        Ok(value)
    }

    fn invalid_escape(&self, escape_start: Position) -> LexError {
        LexError::InvalidEscape {
            sequence: self.input[escape_start.offset..self.position.offset].to_string(),
            position: escape_start,
        }
    }

    /// Reads a numeric literal, as an integer when it fits in `i64`.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let text = match NUMBER_LITERAL.find(self.rest()) {
            Some(m) => m.as_str().to_string(),
            None => {
                return Err(LexError::MalformedNumber {
                    text: self.current_char().map(String::from).unwrap_or_default(),
                    position: start,
                });
            }
        };

        for _ in 0..text.len() {
            self.advance();
        }

        // `1.2.3`, `0.E` and `12abc` must not split into several tokens.
        if let Some(ch) = self.current_char()
            && (ch.is_alphanumeric() || ch == '_' || ch == '.')
        {
            return Err(LexError::MalformedNumber {
                text: format!("{}{}", text, ch),
                position: start,
            });
        }

        if let Ok(n) = text.parse::<i64>() {
            return Ok(Token::Integer(n));
        }

        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Double(n)),
            Ok(_) => Err(LexError::NumberOutOfRange { text, position: start }),
            Err(_) => Err(LexError::MalformedNumber { text, position: start }),
        }
    }

    /// Consumes one or two characters and returns `token`.
    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn pair(&mut self, second: char, paired: Token, single: Token) -> Token {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            paired
        } else {
            single
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('*') => self.single(Token::Star),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('/') => self.single(Token::Slash),
            Some('%') => self.single(Token::Percent),
            Some('=') => self.single(Token::Eq),
            Some('&') => self.single(Token::Ampersand),
            Some('^') => self.single(Token::Caret),
            Some('~') => self.single(Token::Tilde),
            Some('<') => self.pair('=', Token::LtEq, Token::Lt),
            Some('>') => self.pair('=', Token::GtEq, Token::Gt),
            Some('|') => self.pair('|', Token::DoublePipe, Token::Pipe),
            Some('?') => self.pair('?', Token::DoubleQuestion, Token::Question),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::NotEq
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '!',
                        position: self.position,
                    });
                }
            }
            Some('.') => {
                if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()?
                } else {
                    self.single(Token::Dot)
                }
            }
            Some('"') => Token::String(self.read_string('"')?),
            Some('\'') => Token::String(self.read_string('\'')?),
            Some('@') => self.read_parameter()?,
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Token::keyword(&ident).unwrap_or(Token::Identifier(ident))
            }
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    position: self.position,
                });
            }
        };

        Ok(token)
    }
}

#[test]
fn test_keywords_ignore_case() {
    let mut lexer = Lexer::new("select Distinct TOP value");
    assert_eq!(lexer.next_token().unwrap(), Token::Select);
    assert_eq!(lexer.next_token().unwrap(), Token::Distinct);
    assert_eq!(lexer.next_token().unwrap(), Token::Top);
    assert_eq!(lexer.next_token().unwrap(), Token::Value);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_where_clause() {
    let mut lexer = Lexer::new("WHERE c.age >= 21");
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("c".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Dot);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("age".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(21));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_token_start_tracks_lines() {
    let mut lexer = Lexer::new("SELECT *\nFROM c");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap(), Token::From);
    assert_eq!(
        lexer.token_start(),
        Position {
            offset: 9,
            line: 2,
            column: 1
        }
    );
}
