//! Query text rendering.
//!
//! This module turns AST nodes back into query text. The output parses back
//! to an equal tree, so it can be used for logging, plan-cache keys or
//! rewriting.
//!
//! # Features
//!
//! - **Compact output** via [`to_text()`] - one line, single spaces
//! - **Pretty output** via [`to_text_pretty()`] - one clause per line,
//!   subqueries indented by four spaces per level
//! - **Minimal parentheses** - a sub-expression is wrapped only when the
//!   precedence ladder would otherwise bind it differently
//! - **Canonical literals** - keywords upper-case, `true`/`false`/`null`
//!   lower-case, strings double-quoted with JSON escapes
//!
//! # Examples
//!
//! ```
//! use cosmos_sql::output::{to_text, to_text_pretty};
//!
//! let query = cosmos_sql::parse("select * from c where (c.a + 1) * 2 > c.b").unwrap();
//!
//! assert_eq!(to_text(&query), "SELECT * FROM c WHERE (c.a + 1) * 2 > c.b");
//! assert_eq!(to_text_pretty(&query), "SELECT *\nFROM c\nWHERE (c.a + 1) * 2 > c.b");
//! ```

use std::fmt;

use crate::ast::{
    Collection, CollectionExpr, Literal, PathExpr, Precedence, Query, ScalarExpr, SelectClause,
    SelectSpec, UnaryOp,
};

pub struct QueryPrinter {
    pretty: bool,
}

impl QueryPrinter {
    pub fn new(pretty: bool) -> Self {
        QueryPrinter { pretty }
    }

    pub fn print_query(&self, query: &Query) -> String {
        self.query(query, 0)
    }

    pub fn print_scalar(&self, expr: &ScalarExpr) -> String {
        self.scalar(expr, 0)
    }

    pub fn print_collection(&self, expr: &CollectionExpr) -> String {
        self.collection_expr(expr, 0)
    }

    fn query(&self, query: &Query, indent: usize) -> String {
        let mut clauses = vec![self.select_clause(&query.select, indent)];

        if let Some(from) = &query.from {
            clauses.push(format!("FROM {}", self.collection_expr(&from.expr, indent)));
        }
        if let Some(where_clause) = &query.where_clause {
            clauses.push(format!("WHERE {}", self.scalar(&where_clause.expr, indent)));
        }
        if let Some(group_by) = &query.group_by {
            clauses.push(format!("GROUP BY {}", self.scalar_list(&group_by.exprs, indent)));
        }
        if let Some(order_by) = &query.order_by {
            let items: Vec<String> = order_by
                .items
                .iter()
                .map(|item| {
                    let expr = self.scalar(&item.expr, indent);
                    if item.descending {
                        format!("{} DESC", expr)
                    } else {
                        expr
                    }
                })
                .collect();
            clauses.push(format!("ORDER BY {}", items.join(", ")));
        }
        if let Some(offset_limit) = &query.offset_limit {
            clauses.push(format!(
                "OFFSET {} LIMIT {}",
                self.scalar(&offset_limit.offset.expr, indent),
                self.scalar(&offset_limit.limit.expr, indent)
            ));
        }

        if self.pretty {
            clauses.join(&format!("\n{}", self.indent(indent)))
        } else {
            clauses.join(" ")
        }
    }

    fn select_clause(&self, select: &SelectClause, indent: usize) -> String {
        let mut result = "SELECT ".to_string();
        if select.distinct {
            result.push_str("DISTINCT ");
        }
        if let Some(top) = &select.top {
            result.push_str(&format!("TOP {} ", self.scalar(&top.expr, indent)));
        }

        match &select.spec {
            SelectSpec::Star => result.push('*'),
            SelectSpec::Value(expr) => {
                result.push_str("VALUE ");
                result.push_str(&self.scalar(expr, indent));
            }
            SelectSpec::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| match &item.alias {
                        Some(alias) => {
                            format!("{} AS {}", self.scalar(&item.expr, indent), alias.as_str())
                        }
                        None => self.scalar(&item.expr, indent),
                    })
                    .collect();
                result.push_str(&items.join(", "));
            }
        }
        result
    }

    /// Parenthesized subquery; in pretty mode the body moves one level in.
    fn subquery(&self, query: &Query, indent: usize) -> String {
        if self.pretty {
            format!(
                "(\n{}{}\n{})",
                self.indent(indent + 1),
                self.query(query, indent + 1),
                self.indent(indent)
            )
        } else {
            format!("({})", self.query(query, indent))
        }
    }

    fn collection_expr(&self, expr: &CollectionExpr, indent: usize) -> String {
        match expr {
            CollectionExpr::Aliased { collection, alias } => match alias {
                Some(alias) => format!("{} AS {}", self.collection(collection, indent), alias.as_str()),
                None => self.collection(collection, indent),
            },
            CollectionExpr::ArrayIterator { alias, collection } => {
                format!("{} IN {}", alias.as_str(), self.collection(collection, indent))
            }
            CollectionExpr::Join { left, right } => format!(
                "{} JOIN {}",
                self.collection_expr(left, indent),
                self.collection_expr(right, indent)
            ),
        }
    }

    fn collection(&self, collection: &Collection, indent: usize) -> String {
        match collection {
            Collection::InputPath {
                input,
                relative_path,
            } => {
                let mut result = input.as_str().to_string();
                if let Some(path) = relative_path {
                    self.path(path, &mut result);
                }
                result
            }
            Collection::Subquery(query) => self.subquery(query, indent),
            Collection::LiteralArray(items) => format!("[{}]", self.scalar_list(items, indent)),
        }
    }

    /// Appends `path` outermost segment first.
    fn path(&self, path: &PathExpr, out: &mut String) {
        if let Some(parent) = path.parent() {
            self.path(parent, out);
        }
        match path {
            PathExpr::Identifier { value, .. } => {
                out.push('.');
                out.push_str(value.as_str());
            }
            PathExpr::Number { value, .. } => out.push_str(&format!("[{}]", value)),
            PathExpr::String { value, .. } => out.push_str(&format!("[{}]", quote(value))),
        }
    }

    fn scalar_list(&self, exprs: &[ScalarExpr], indent: usize) -> String {
        exprs
            .iter()
            .map(|e| self.scalar(e, indent))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders `expr`, parenthesized if it binds looser than `min`.
    fn operand(&self, expr: &ScalarExpr, min: Precedence, indent: usize) -> String {
        let text = self.scalar(expr, indent);
        if precedence(expr) < min {
            format!("({})", text)
        } else {
            text
        }
    }

    fn scalar(&self, expr: &ScalarExpr, indent: usize) -> String {
        match expr {
            ScalarExpr::Literal(literal) => literal_text(literal),

            ScalarExpr::Unary { op, expr: operand } => {
                let operand = self.operand(operand, Precedence::Unary, indent);
                match op {
                    UnaryOp::Not => format!("NOT {}", operand),
                    // Keep `- -1` from reading as `--1`.
                    _ if operand.starts_with(['-', '+']) => format!("{} {}", op.symbol(), operand),
                    _ => format!("{}{}", op.symbol(), operand),
                }
            }

            ScalarExpr::Binary { op, left, right } => {
                let level = op.precedence();
                format!(
                    "{} {} {}",
                    self.operand(left, level, indent),
                    op.symbol(),
                    self.operand(right, level.tighter(), indent)
                )
            }

            ScalarExpr::Between {
                expr: needle,
                low,
                high,
                not,
            } => format!(
                "{} {}BETWEEN {} AND {}",
                self.operand(needle, Precedence::Relational, indent),
                if *not { "NOT " } else { "" },
                self.operand(low, Precedence::Additive, indent),
                self.operand(high, Precedence::Additive, indent)
            ),

            ScalarExpr::Conditional {
                condition,
                consequent,
                alternative,
            } => format!(
                "{} ? {} : {}",
                self.operand(condition, Precedence::Coalesce, indent),
                self.scalar(consequent, indent),
                self.scalar(alternative, indent)
            ),

            ScalarExpr::Coalesce { left, right } => format!(
                "{} ?? {}",
                self.operand(left, Precedence::Coalesce, indent),
                self.operand(right, Precedence::StringConcat, indent)
            ),

            ScalarExpr::In {
                expr: needle,
                items,
                not,
            } => format!(
                "{} {}IN ({})",
                self.operand(needle, Precedence::Relational, indent),
                if *not { "NOT " } else { "" },
                self.scalar_list(items, indent)
            ),

            ScalarExpr::Exists(query) => format!("EXISTS{}", self.subquery(query, indent)),
            ScalarExpr::ArrayOfQuery(query) => format!("ARRAY{}", self.subquery(query, indent)),
            ScalarExpr::Subquery(query) => self.subquery(query, indent),

            ScalarExpr::FunctionCall { name, udf, args } => format!(
                "{}{}({})",
                if *udf { "udf." } else { "" },
                name.as_str(),
                self.scalar_list(args, indent)
            ),

            ScalarExpr::MemberIndexer { member, index } => format!(
                "{}[{}]",
                self.operand(member, Precedence::Primary, indent),
                self.scalar(index, indent)
            ),

            ScalarExpr::PropertyRef { member, identifier } => match member {
                // `5.x` would lex as a malformed number.
                Some(member) if is_number_literal(member) => format!(
                    "({}).{}",
                    self.scalar(member, indent),
                    identifier.as_str()
                ),
                Some(member) => format!(
                    "{}.{}",
                    self.operand(member, Precedence::Primary, indent),
                    identifier.as_str()
                ),
                None => identifier.as_str().to_string(),
            },

            ScalarExpr::ParameterRef(parameter) => parameter.as_str().to_string(),

            ScalarExpr::ArrayCreate(items) => format!("[{}]", self.scalar_list(items, indent)),

            ScalarExpr::ObjectCreate(properties) => {
                if properties.is_empty() {
                    return "{}".to_string();
                }
                let properties: Vec<String> = properties
                    .iter()
                    .map(|p| {
                        format!(
                            "{}: {}",
                            quote(p.name.as_str()),
                            self.scalar(&p.expr, indent)
                        )
                    })
                    .collect();
                format!("{{{}}}", properties.join(", "))
            }
        }
    }

    fn indent(&self, level: usize) -> String {
        "    ".repeat(level)
    }
}

/// Level at which `expr` binds when printed without parentheses.
fn precedence(expr: &ScalarExpr) -> Precedence {
    match expr {
        ScalarExpr::Conditional { .. } => Precedence::Conditional,
        ScalarExpr::Coalesce { .. } => Precedence::Coalesce,
        ScalarExpr::Binary { op, .. } => op.precedence(),
        ScalarExpr::Between { .. } | ScalarExpr::In { .. } => Precedence::Relational,
        ScalarExpr::Unary { .. } => Precedence::Unary,
        // A negative number prints with a leading sign, which the parser
        // reads back as a prefix operator.
        ScalarExpr::Literal(literal) => match literal.as_ref() {
            Literal::Number(n) if n.to_double().is_sign_negative() => Precedence::Unary,
            _ => Precedence::Primary,
        },
        _ => Precedence::Primary,
    }
}

fn is_number_literal(expr: &ScalarExpr) -> bool {
    matches!(expr, ScalarExpr::Literal(literal) if matches!(literal.as_ref(), Literal::Number(_)))
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Undefined => "undefined".to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Number(n) => n.to_string(),
        Literal::String(s) => quote(s),
    }
}

/// Double-quoted string with JSON escapes.
fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Renders a query on one line.
///
/// # Examples
///
/// ```
/// use cosmos_sql::output::to_text;
///
/// let query = cosmos_sql::parse("SELECT VALUE {'name': c.name} FROM c").unwrap();
/// assert_eq!(to_text(&query), r#"SELECT VALUE {"name": c.name} FROM c"#);
/// ```
pub fn to_text(query: &Query) -> String {
    QueryPrinter::new(false).print_query(query)
}

/// Renders a query with one clause per line.
///
/// Subqueries open on their own line, indented four spaces deeper than the
/// clause that contains them.
///
/// # Examples
///
/// ```
/// use cosmos_sql::output::to_text_pretty;
///
/// let query = cosmos_sql::parse("SELECT * FROM c WHERE EXISTS(SELECT * FROM t IN c.tags)").unwrap();
/// assert_eq!(
///     to_text_pretty(&query),
///     "SELECT *\nFROM c\nWHERE EXISTS(\n    SELECT *\n    FROM t IN c.tags\n)"
/// );
/// ```
pub fn to_text_pretty(query: &Query) -> String {
    QueryPrinter::new(true).print_query(query)
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&QueryPrinter::new(false).print_scalar(self))
    }
}

impl fmt::Display for CollectionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&QueryPrinter::new(false).print_collection(self))
    }
}
