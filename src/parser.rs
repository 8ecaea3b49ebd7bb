use crate::{
    ast::{
        BinaryOp, Collection, CollectionExpr, FromClause, GroupByClause, Identifier, LimitSpec,
        Literal, ObjectProperty, OffsetLimitClause, OffsetSpec, OrderByClause, OrderByItem,
        Parameter, PathExpr, PropertyName, Query, ScalarExpr, SelectClause, SelectItem,
        SelectSpec, Token, TopSpec, UnaryOp, WhereClause,
    },
    lexer::{LexError, Lexer, Position},
    number::Number64,
};
use log::trace;
use std::fmt;
use std::mem;

/// Errors that abort a parse. There is no recovery and no partial tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The text could not be tokenized
    Lex(LexError),

    /// A token did not fit the grammar
    Syntax {
        position: Position,
        expected: String,
        found: String,
    },

    /// Expressions or subqueries nested deeper than [`ParserOptions::max_depth`]
    NestingTooDeep { position: Position, limit: usize },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Syntax { position, .. } | ParseError::NestingTooDeep { position, .. } => {
                *position
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::Syntax {
                position,
                expected,
                found,
            } => write!(
                f,
                "Syntax error at {}: expected {}, found {}",
                position, expected, found
            ),
            ParseError::NestingTooDeep { position, limit } => write!(
                f,
                "Nesting too deep at {}: expressions may nest at most {} levels",
                position, limit
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting depth. Parentheses, prefix operators and subqueries
    /// each add a level, and so does every link of an operator, `JOIN` or
    /// path chain.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { max_depth: 64 }
    }
}

/// Recursive-descent parser over the scalar precedence ladder.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
    options: ParserOptions,
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Self::with_options(lexer, ParserOptions::default())
    }

    pub fn with_options(mut lexer: Lexer, options: ParserOptions) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
            options,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    /// Takes the current token and moves to the next one.
    fn bump(&mut self) -> Result<Token, ParseError> {
        let token = mem::replace(&mut self.current_token, Token::Eof);
        self.advance()?;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.error(&expected.to_string()));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Advances past `token` if it is current.
    fn consume(&mut self, token: &Token) -> Result<bool, ParseError> {
        if self.check(token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        ParseError::Syntax {
            position: self.current_position,
            expected: expected.to_string(),
            found: self.current_token.to_string(),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                position: self.current_position,
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Counts one more parent folded onto the left operand of a loop.
    /// Left-deep chains nest as deeply as parentheses do.
    fn fold(&mut self, folds: &mut usize) -> Result<(), ParseError> {
        self.descend()?;
        *folds += 1;
        Ok(())
    }

    fn unfold(&mut self, folds: usize) {
        self.depth -= folds;
    }

    fn expect_identifier(&mut self) -> Result<Identifier, ParseError> {
        match &self.current_token {
            Token::Identifier(name) => {
                let identifier = Identifier::new(name.as_str());
                self.advance()?;
                Ok(identifier)
            }
            _ => Err(self.error("identifier")),
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.check(&Token::Eof) {
            Ok(())
        } else {
            Err(self.error("end of input"))
        }
    }

    /// Parses `item (',' item)*`; at least one item, no trailing comma.
    fn parse_comma_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.consume(&Token::Comma)? {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Parses a possibly empty, comma separated list closed by `close`.
    fn parse_delimited<T>(
        &mut self,
        close: Token,
        item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        if self.consume(&close)? {
            return Ok(vec![]);
        }
        let items = self.parse_comma_list(item)?;
        self.expect(close)?;
        Ok(items)
    }

    // ------------------------------------------------------------------------
    // Queries and clauses
    // ------------------------------------------------------------------------

    /// Parses a whole query; the input must end after it.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let query = self.parse_query_body()?;
        self.expect_eof()?;
        Ok(query)
    }

    fn parse_query_body(&mut self) -> Result<Query, ParseError> {
        self.descend()?;

        let select = self.parse_select_clause()?;
        let mut query = Query::new(select);

        if self.check(&Token::From) {
            query.from = Some(self.parse_from_clause()?);
        }
        if self.check(&Token::Where) {
            self.advance()?;
            query.where_clause = Some(WhereClause {
                expr: self.parse_expression()?,
            });
        }
        if self.check(&Token::Group) {
            query.group_by = Some(self.parse_group_by_clause()?);
        }
        if self.check(&Token::Order) {
            query.order_by = Some(self.parse_order_by_clause()?);
        }
        if self.check(&Token::Offset) {
            query.offset_limit = Some(self.parse_offset_limit_clause()?);
        }

        self.ascend();
        Ok(query)
    }

    fn parse_select_clause(&mut self) -> Result<SelectClause, ParseError> {
        self.expect(Token::Select)?;

        let distinct = self.consume(&Token::Distinct)?;
        let top = if self.consume(&Token::Top)? {
            Some(TopSpec {
                expr: self.parse_count()?,
            })
        } else {
            None
        };

        let spec = match self.current_token {
            Token::Star => {
                self.advance()?;
                SelectSpec::Star
            }
            Token::Value => {
                self.advance()?;
                SelectSpec::Value(self.parse_expression()?)
            }
            _ => SelectSpec::List(self.parse_comma_list(Self::parse_select_item)?),
        };

        Ok(SelectClause {
            spec,
            top,
            distinct,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, ParseError> {
        let expr = self.parse_expression()?;
        let alias = self.parse_alias()?;
        Ok(SelectItem { expr, alias })
    }

    /// `AS name`, or a bare name.
    fn parse_alias(&mut self) -> Result<Option<Identifier>, ParseError> {
        if self.consume(&Token::As)? {
            return self.expect_identifier().map(Some);
        }
        if self.check(&Token::Identifier(String::new())) {
            return self.expect_identifier().map(Some);
        }
        Ok(None)
    }

    /// Count of `TOP`, `OFFSET` or `LIMIT`: a number literal or a parameter.
    fn parse_count(&mut self) -> Result<ScalarExpr, ParseError> {
        match &self.current_token {
            Token::Integer(n) => {
                let expr = ScalarExpr::number(*n);
                self.advance()?;
                Ok(expr)
            }
            Token::Double(n) => {
                let expr = ScalarExpr::number(*n);
                self.advance()?;
                Ok(expr)
            }
            Token::Parameter(name) => {
                let expr = ScalarExpr::ParameterRef(Parameter::new(name.as_str()));
                self.advance()?;
                Ok(expr)
            }
            _ => Err(self.error("number or parameter")),
        }
    }

    fn parse_from_clause(&mut self) -> Result<FromClause, ParseError> {
        self.expect(Token::From)?;
        let mut expr = self.parse_collection_operand()?;
        let mut folds = 0;

        while self.consume(&Token::Join)? {
            self.fold(&mut folds)?;
            let right = self.parse_collection_operand()?;
            expr = CollectionExpr::Join {
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        self.unfold(folds);
        Ok(FromClause { expr })
    }

    /// One side of a `JOIN`: `name IN collection` or `collection [AS alias]`.
    fn parse_collection_operand(&mut self) -> Result<CollectionExpr, ParseError> {
        if let Token::Identifier(_) = self.current_token {
            let name = self.expect_identifier()?;

            if self.consume(&Token::In)? {
                let collection = self.parse_collection()?;
                return Ok(CollectionExpr::ArrayIterator {
                    alias: name,
                    collection,
                });
            }

            let collection = self.parse_input_path(name)?;
            let alias = self.parse_alias()?;
            return Ok(CollectionExpr::Aliased { collection, alias });
        }

        let collection = self.parse_collection()?;
        let alias = self.parse_alias()?;
        Ok(CollectionExpr::Aliased { collection, alias })
    }

    fn parse_collection(&mut self) -> Result<Collection, ParseError> {
        match self.current_token {
            Token::Identifier(_) => {
                let input = self.expect_identifier()?;
                self.parse_input_path(input)
            }
            Token::LParen => {
                self.advance()?;
                if !self.check(&Token::Select) {
                    return Err(self.error("subquery"));
                }
                let query = self.parse_query_body()?;
                self.expect(Token::RParen)?;
                Ok(Collection::Subquery(Box::new(query)))
            }
            Token::LBracket => {
                self.advance()?;
                let items = self.parse_comma_list(Self::parse_expression)?;
                self.expect(Token::RBracket)?;
                Ok(Collection::LiteralArray(items))
            }
            _ => Err(self.error("collection")),
        }
    }

    /// Path segments after an input identifier: `.name`, `[number]`, `['key']`.
    fn parse_input_path(&mut self, input: Identifier) -> Result<Collection, ParseError> {
        let mut path: Option<PathExpr> = None;
        let mut folds = 0;

        loop {
            if self.consume(&Token::Dot)? {
                self.fold(&mut folds)?;
                let value = self.expect_identifier()?;
                path = Some(PathExpr::Identifier {
                    parent: path.map(Box::new),
                    value,
                });
            } else if self.consume(&Token::LBracket)? {
                self.fold(&mut folds)?;
                let parent = path.map(Box::new);
                let position = self.current_position;
                path = Some(match self.bump()? {
                    Token::Integer(n) => PathExpr::Number {
                        parent,
                        value: Number64::from_integer(n),
                    },
                    Token::Double(n) => PathExpr::Number {
                        parent,
                        value: Number64::from_double(n),
                    },
                    Token::String(s) => PathExpr::String { parent, value: s },
                    found => {
                        return Err(ParseError::Syntax {
                            position,
                            expected: "number or string".to_string(),
                            found: found.to_string(),
                        });
                    }
                });
                self.expect(Token::RBracket)?;
            } else {
                break;
            }
        }

        self.unfold(folds);
        Ok(Collection::InputPath {
            input,
            relative_path: path,
        })
    }

    fn parse_group_by_clause(&mut self) -> Result<GroupByClause, ParseError> {
        self.expect(Token::Group)?;
        self.expect(Token::By)?;
        let exprs = self.parse_comma_list(Self::parse_expression)?;
        Ok(GroupByClause { exprs })
    }

    fn parse_order_by_clause(&mut self) -> Result<OrderByClause, ParseError> {
        self.expect(Token::Order)?;
        self.expect(Token::By)?;
        let items = self.parse_comma_list(|parser| {
            let expr = parser.parse_expression()?;
            let descending = if parser.consume(&Token::Desc)? {
                true
            } else {
                parser.consume(&Token::Asc)?;
                false
            };
            Ok(OrderByItem { expr, descending })
        })?;
        Ok(OrderByClause { items })
    }

    fn parse_offset_limit_clause(&mut self) -> Result<OffsetLimitClause, ParseError> {
        self.expect(Token::Offset)?;
        let offset = OffsetSpec {
            expr: self.parse_count()?,
        };
        self.expect(Token::Limit)?;
        let limit = LimitSpec {
            expr: self.parse_count()?,
        };
        Ok(OffsetLimitClause { offset, limit })
    }

    // ------------------------------------------------------------------------
    // Scalar expressions, loosest binding first
    // ------------------------------------------------------------------------

    /// Parses a standalone scalar expression; the input must end after it.
    pub fn parse(&mut self) -> Result<ScalarExpr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect_eof()?;
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<ScalarExpr, ParseError> {
        self.descend()?;
        let expr = self.parse_conditional()?;
        self.ascend();
        Ok(expr)
    }

    /// `cond ? then : else`, right-associative
    fn parse_conditional(&mut self) -> Result<ScalarExpr, ParseError> {
        let condition = self.parse_coalesce()?;
        if !self.consume(&Token::Question)? {
            return Ok(condition);
        }

        let consequent = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let alternative = self.parse_expression()?;

        Ok(ScalarExpr::Conditional {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternative: Box::new(alternative),
        })
    }

    fn parse_coalesce(&mut self) -> Result<ScalarExpr, ParseError> {
        let mut left = self.parse_string_concat()?;
        let mut folds = 0;
        while self.consume(&Token::DoubleQuestion)? {
            self.fold(&mut folds)?;
            let right = self.parse_string_concat()?;
            left = ScalarExpr::Coalesce {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.unfold(folds);
        Ok(left)
    }

    /// Left-associative binary level: operands from `operand`, operators
    /// recognised by `operator`.
    fn parse_binary_level(
        &mut self,
        operand: fn(&mut Self) -> Result<ScalarExpr, ParseError>,
        operator: fn(&Token) -> Option<BinaryOp>,
    ) -> Result<ScalarExpr, ParseError> {
        let mut left = operand(self)?;
        let mut folds = 0;
        while let Some(op) = operator(&self.current_token) {
            self.advance()?;
            self.fold(&mut folds)?;
            let right = operand(self)?;
            left = ScalarExpr::binary(op, left, right);
        }
        self.unfold(folds);
        Ok(left)
    }

    fn parse_string_concat(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_or, |token| match token {
            Token::DoublePipe => Some(BinaryOp::StringConcat),
            _ => None,
        })
    }

    fn parse_or(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_and, |token| match token {
            Token::Or => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn parse_and(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_bitwise_or, |token| match token {
            Token::And => Some(BinaryOp::And),
            _ => None,
        })
    }

    fn parse_bitwise_or(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_bitwise_xor, |token| match token {
            Token::Pipe => Some(BinaryOp::BitwiseOr),
            _ => None,
        })
    }

    fn parse_bitwise_xor(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_bitwise_and, |token| match token {
            Token::Caret => Some(BinaryOp::BitwiseXor),
            _ => None,
        })
    }

    fn parse_bitwise_and(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_equality, |token| match token {
            Token::Ampersand => Some(BinaryOp::BitwiseAnd),
            _ => None,
        })
    }

    fn parse_equality(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_relational, |token| match token {
            Token::Eq => Some(BinaryOp::Equal),
            Token::NotEq => Some(BinaryOp::NotEqual),
            _ => None,
        })
    }

    /// Comparisons, `[NOT] BETWEEN` and `[NOT] IN`
    fn parse_relational(&mut self) -> Result<ScalarExpr, ParseError> {
        let mut left = self.parse_additive()?;
        let mut folds = 0;

        loop {
            let op = match self.current_token {
                Token::Lt => Some(BinaryOp::LessThan),
                Token::LtEq => Some(BinaryOp::LessThanOrEqual),
                Token::Gt => Some(BinaryOp::GreaterThan),
                Token::GtEq => Some(BinaryOp::GreaterThanOrEqual),
                _ => None,
            };

            if let Some(op) = op {
                self.advance()?;
                self.fold(&mut folds)?;
                let right = self.parse_additive()?;
                left = ScalarExpr::binary(op, left, right);
                continue;
            }

            let not = match self.current_token {
                Token::Not => {
                    self.advance()?;
                    if !self.check(&Token::Between) && !self.check(&Token::In) {
                        return Err(self.error("BETWEEN or IN"));
                    }
                    true
                }
                Token::Between | Token::In => false,
                _ => break,
            };

            self.fold(&mut folds)?;
            left = if self.consume(&Token::Between)? {
                self.parse_between(left, not)?
            } else {
                self.expect(Token::In)?;
                self.parse_in(left, not)?
            };
        }

        self.unfold(folds);
        Ok(left)
    }

    fn parse_between(&mut self, expr: ScalarExpr, not: bool) -> Result<ScalarExpr, ParseError> {
        let low = self.parse_additive()?;
        self.expect(Token::And)?;
        let high = self.parse_additive()?;
        Ok(ScalarExpr::Between {
            expr: Box::new(expr),
            low: Box::new(low),
            high: Box::new(high),
            not,
        })
    }

    fn parse_in(&mut self, expr: ScalarExpr, not: bool) -> Result<ScalarExpr, ParseError> {
        self.expect(Token::LParen)?;
        let items = self.parse_comma_list(Self::parse_expression)?;
        self.expect(Token::RParen)?;
        Ok(ScalarExpr::In {
            expr: Box::new(expr),
            items,
            not,
        })
    }

    fn parse_additive(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_multiplicative, |token| match token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Subtract),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<ScalarExpr, ParseError> {
        self.parse_binary_level(Self::parse_unary, |token| match token {
            Token::Star => Some(BinaryOp::Multiply),
            Token::Slash => Some(BinaryOp::Divide),
            Token::Percent => Some(BinaryOp::Modulo),
            _ => None,
        })
    }

    /// Prefix operators, right-associative
    fn parse_unary(&mut self) -> Result<ScalarExpr, ParseError> {
        let op = match self.current_token {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            Token::Tilde => UnaryOp::BitwiseNot,
            Token::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        self.advance()?;

        self.descend()?;
        let operand = self.parse_unary()?;
        self.ascend();

        Ok(ScalarExpr::unary(op, operand))
    }

    /// Property access and indexing, left-associative
    fn parse_postfix(&mut self) -> Result<ScalarExpr, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut folds = 0;

        loop {
            if self.consume(&Token::Dot)? {
                self.fold(&mut folds)?;
                let identifier = self.expect_identifier()?;
                expr = ScalarExpr::PropertyRef {
                    member: Some(Box::new(expr)),
                    identifier,
                };
            } else if self.consume(&Token::LBracket)? {
                self.fold(&mut folds)?;
                let index = self.parse_expression()?;
                self.expect(Token::RBracket)?;
                expr = ScalarExpr::MemberIndexer {
                    member: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }

        self.unfold(folds);
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ScalarExpr, ParseError> {
        let position = self.current_position;

        match self.bump()? {
            // Literals
            Token::Integer(n) => Ok(ScalarExpr::number(n)),
            Token::Double(n) => Ok(ScalarExpr::number(n)),
            Token::String(s) => Ok(ScalarExpr::string(s)),
            Token::True => Ok(ScalarExpr::Literal(Literal::boolean(true))),
            Token::False => Ok(ScalarExpr::Literal(Literal::boolean(false))),
            Token::Null => Ok(ScalarExpr::Literal(Literal::null())),
            Token::Undefined => Ok(ScalarExpr::Literal(Literal::undefined())),

            Token::Parameter(name) => Ok(ScalarExpr::ParameterRef(Parameter::new(name))),

            // Subquery or grouping
            Token::LParen => {
                if self.check(&Token::Select) {
                    let query = self.parse_query_body()?;
                    self.expect(Token::RParen)?;
                    return Ok(ScalarExpr::Subquery(Box::new(query)));
                }
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }

            Token::LBracket => {
                let items = self.parse_delimited(Token::RBracket, Self::parse_expression)?;
                Ok(ScalarExpr::ArrayCreate(items))
            }

            Token::LBrace => {
                let properties = self.parse_delimited(Token::RBrace, Self::parse_object_property)?;
                Ok(ScalarExpr::ObjectCreate(properties))
            }

            Token::Exists => Ok(ScalarExpr::Exists(Box::new(self.parse_query_argument()?))),
            Token::Array => Ok(ScalarExpr::ArrayOfQuery(Box::new(self.parse_query_argument()?))),

            Token::Udf => {
                self.expect(Token::Dot)?;
                let name = self.expect_identifier()?;
                self.parse_call(name, true)
            }

            Token::Identifier(name) => {
                let identifier = Identifier::new(name);
                if self.check(&Token::LParen) {
                    self.parse_call(identifier, false)
                } else {
                    Ok(ScalarExpr::PropertyRef {
                        member: None,
                        identifier,
                    })
                }
            }

            found => Err(ParseError::Syntax {
                position,
                expected: "expression".to_string(),
                found: found.to_string(),
            }),
        }
    }

    fn parse_object_property(&mut self) -> Result<ObjectProperty, ParseError> {
        let name = match &self.current_token {
            Token::String(s) => PropertyName::new(s.as_str()),
            _ => return Err(self.error("property name string")),
        };
        self.advance()?;
        self.expect(Token::Colon)?;
        let expr = self.parse_expression()?;
        Ok(ObjectProperty { name, expr })
    }

    /// `(SELECT ...)` after `EXISTS` or `ARRAY`
    fn parse_query_argument(&mut self) -> Result<Query, ParseError> {
        self.expect(Token::LParen)?;
        if !self.check(&Token::Select) {
            return Err(self.error("subquery"));
        }
        let query = self.parse_query_body()?;
        self.expect(Token::RParen)?;
        Ok(query)
    }

    fn parse_call(&mut self, name: Identifier, udf: bool) -> Result<ScalarExpr, ParseError> {
        self.expect(Token::LParen)?;
        let args = self.parse_delimited(Token::RParen, Self::parse_expression)?;
        trace!("parsed call to {}{}", if udf { "udf." } else { "" }, name.as_str());
        Ok(ScalarExpr::FunctionCall { name, udf, args })
    }
}
