pub mod ast;
pub mod cli;
pub mod hasher;
pub mod lexer;
pub mod number;
pub mod obfuscator;
pub mod output;
pub mod parser;

pub use ast::{BinaryOp, CollectionExpr, Literal, NodeKind, Query, ScalarExpr, Token, UnaryOp};
pub use hasher::StructuralHasher;
pub use lexer::{LexError, Lexer, Position};
pub use number::{DecodeError, EncodingError, Number64};
pub use obfuscator::Obfuscator;
pub use output::{to_text, to_text_pretty};
pub use parser::{ParseError, Parser, ParserOptions};

use log::debug;

/// Parses query text with the default [`ParserOptions`].
///
/// # Examples
///
/// ```
/// let query = cosmos_sql::parse("SELECT c.name FROM c WHERE c.age > 21").unwrap();
/// assert!(query.where_clause.is_some());
///
/// assert!(cosmos_sql::parse("SELECT").is_err());
/// ```
pub fn parse(text: &str) -> Result<Query, ParseError> {
    parse_with_options(text, ParserOptions::default())
}

pub fn parse_with_options(text: &str, options: ParserOptions) -> Result<Query, ParseError> {
    debug!("parsing query ({} bytes)", text.len());
    let mut parser = Parser::with_options(Lexer::new(text), options)?;
    let query = parser.parse_query();
    if let Err(e) = &query {
        debug!("parse failed: {}", e);
    }
    query
}

/// Parses a standalone scalar expression such as `c.age BETWEEN 18 AND 65`.
pub fn parse_scalar_expression(text: &str) -> Result<ScalarExpr, ParseError> {
    let mut parser = Parser::new(Lexer::new(text))?;
    parser.parse()
}
