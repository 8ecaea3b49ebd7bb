use std::fmt;
use std::str::FromStr;

use crate::ast::clauses::{
    FromClause, GroupByClause, OffsetLimitClause, OrderByClause, SelectClause, WhereClause,
};
use crate::hasher::StructuralHasher;
use crate::obfuscator::Obfuscator;
use crate::output::QueryPrinter;
use crate::parser::ParseError;

/// A complete query. Every clause but `SELECT` is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub select: SelectClause,
    pub from: Option<FromClause>,
    pub where_clause: Option<WhereClause>,
    pub group_by: Option<GroupByClause>,
    pub order_by: Option<OrderByClause>,
    pub offset_limit: Option<OffsetLimitClause>,
}

impl Query {
    /// Query with only a `SELECT` clause.
    pub fn new(select: SelectClause) -> Self {
        Query {
            select,
            from: None,
            where_clause: None,
            group_by: None,
            order_by: None,
            offset_limit: None,
        }
    }

    pub fn parse(text: &str) -> Result<Query, ParseError> {
        crate::parse(text)
    }

    /// Renders the query as text, one clause per line when `pretty`.
    pub fn to_text(&self, pretty: bool) -> String {
        QueryPrinter::new(pretty).print_query(self)
    }

    /// Structural digest for plan-cache keys.
    ///
    /// In non-strict mode the order of select items and object properties
    /// does not affect the result.
    pub fn structural_hash(&self, strict: bool) -> u32 {
        StructuralHasher::new(strict).hash_query(self)
    }

    /// Copy of the query with identifying literals and names replaced.
    pub fn obfuscate(&self) -> Query {
        Obfuscator::new().obfuscate_query(self)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

impl FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}
