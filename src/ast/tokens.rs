use std::fmt;

/// Lexical tokens of the query dialect.
///
/// Keywords are matched case-insensitively by the lexer and carry no text;
/// identifiers keep their original spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal that fits in a signed 64-bit integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 9223372036854775807
    /// ```
    Integer(i64),

    /// Any other numeric literal: decimals, exponents, or integers too wide
    /// for `i64`
    ///
    /// # Examples
    /// ```text
    /// 1337.42
    /// 1E2
    /// 10e-23
    /// 9223372036854775808
    /// ```
    Double(f64),

    /// String literal in single or double quotes, escapes already resolved
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// "it\"s"
    /// ```
    String(String),

    /// Identifier
    ///
    /// Starts with a letter or underscore, followed by letters, digits, or
    /// underscores. Case-sensitive.
    Identifier(String),

    /// Parameter reference, stored with its leading `@`
    ///
    /// # Examples
    /// ```text
    /// @name
    /// @minAge
    /// ```
    Parameter(String),

    // Keywords
    Select,
    Distinct,
    Top,
    Value,
    As,
    From,
    In,
    Join,
    Where,
    Group,
    By,
    Order,
    Asc,
    Desc,
    Offset,
    Limit,
    And,
    Or,
    Not,
    Between,
    Exists,
    Array,
    True,
    False,
    Null,
    Undefined,
    Udf,

    // Punctuation
    Star,
    Comma,
    Dot,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Operators
    Plus,
    Minus,
    Slash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    /// String concatenation (`||`)
    DoublePipe,
    /// Null-coalescing (`??`)
    DoubleQuestion,
    /// Conditional (`? :`)
    Question,

    /// End of input
    Eof,
}

impl Token {
    /// Looks up a keyword, ignoring case.
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word.to_ascii_uppercase().as_str() {
            "SELECT" => Token::Select,
            "DISTINCT" => Token::Distinct,
            "TOP" => Token::Top,
            "VALUE" => Token::Value,
            "AS" => Token::As,
            "FROM" => Token::From,
            "IN" => Token::In,
            "JOIN" => Token::Join,
            "WHERE" => Token::Where,
            "GROUP" => Token::Group,
            "BY" => Token::By,
            "ORDER" => Token::Order,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            "OFFSET" => Token::Offset,
            "LIMIT" => Token::Limit,
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "BETWEEN" => Token::Between,
            "EXISTS" => Token::Exists,
            "ARRAY" => Token::Array,
            "TRUE" => Token::True,
            "FALSE" => Token::False,
            "NULL" => Token::Null,
            "UNDEFINED" => Token::Undefined,
            "UDF" => Token::Udf,
            _ => return None,
        };
        Some(token)
    }

    fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Token::Select => "SELECT",
            Token::Distinct => "DISTINCT",
            Token::Top => "TOP",
            Token::Value => "VALUE",
            Token::As => "AS",
            Token::From => "FROM",
            Token::In => "IN",
            Token::Join => "JOIN",
            Token::Where => "WHERE",
            Token::Group => "GROUP",
            Token::By => "BY",
            Token::Order => "ORDER",
            Token::Asc => "ASC",
            Token::Desc => "DESC",
            Token::Offset => "OFFSET",
            Token::Limit => "LIMIT",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Not => "NOT",
            Token::Between => "BETWEEN",
            Token::Exists => "EXISTS",
            Token::Array => "ARRAY",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::Undefined => "undefined",
            Token::Udf => "udf",
            Token::Star => "*",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Eq => "=",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Tilde => "~",
            Token::DoublePipe => "||",
            Token::DoubleQuestion => "??",
            Token::Question => "?",
            _ => return None,
        };
        Some(symbol)
    }
}

/// Describes the token the way it appears in error messages.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "number {}", n),
            Token::Double(n) => write!(f, "number {:?}", n),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Parameter(name) => write!(f, "parameter '{}'", name),
            Token::Eof => write!(f, "end of input"),
            other => match other.symbol() {
                Some(symbol) => write!(f, "'{}'", symbol),
                None => write!(f, "{:?}", other),
            },
        }
    }
}
