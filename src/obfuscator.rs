use std::collections::HashMap;

use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::ast::{
    Collection, CollectionExpr, FromClause, GroupByClause, Identifier, LimitSpec, Literal,
    ObjectProperty, OffsetLimitClause, OffsetSpec, OrderByClause, OrderByItem, Parameter,
    PathExpr, PropertyName, Query, ScalarExpr, SelectClause, SelectItem, SelectSpec, TopSpec,
    WhereClause,
};
use crate::number::Number64;

/// Strings that never identify anybody: system properties, GeoJSON type and
/// field names.
const EXEMPT_STRINGS: &[&str] = &[
    "GeometryCollection",
    "LineString",
    "MultiLineString",
    "MultiPoint",
    "MultiPolygon",
    "Point",
    "Polygon",
    "_attachments",
    "_etag",
    "_rid",
    "_self",
    "_ts",
    "coordinates",
    "id",
    "name",
    "type",
];

/// Strings at least this long keep their length in the placeholder.
const LONG_STRING: usize = 10;

/// Category of a replaced string. Each has its own counter and prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Placeholder {
    Identifier,
    StringLiteral,
    PropertyName,
    Parameter,
}

impl Placeholder {
    fn prefix(self) -> &'static str {
        match self {
            Placeholder::Identifier => "ident",
            Placeholder::StringLiteral => "str",
            Placeholder::PropertyName => "p",
            Placeholder::Parameter => "param",
        }
    }
}

/// One obfuscation pass.
///
/// Replaces identifiers, property names, parameters, string literals and
/// numbers with stand-ins while keeping the shape of the tree. Within a pass
/// the same input always maps to the same stand-in. Function names, booleans,
/// `null` and `undefined` are kept. State is private to the instance; use a
/// fresh one per query.
///
/// # Examples
///
/// ```
/// use cosmos_sql::obfuscator::Obfuscator;
///
/// let query = cosmos_sql::parse("SELECT * FROM c WHERE c.city = 'Seattle'").unwrap();
/// let hidden = Obfuscator::new().obfuscate_query(&query);
/// assert_eq!(hidden.to_string(), r#"SELECT * FROM c WHERE c.ident1 = "str1""#);
/// ```
#[derive(Debug, Default)]
pub struct Obfuscator {
    strings: HashMap<(Placeholder, String), String>,
    numbers: HashMap<Number64, Number64>,
    number_sequence: u32,
    string_sequence: u32,
    identifier_sequence: u32,
    property_name_sequence: u32,
    parameter_sequence: u32,
}

impl Obfuscator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obfuscate_query(&mut self, query: &Query) -> Query {
        let obfuscated = self.query(query);
        debug!(
            "obfuscated {} distinct strings and {} distinct numbers",
            self.strings.len(),
            self.numbers.len()
        );
        obfuscated
    }

    pub fn obfuscate_scalar(&mut self, expr: &ScalarExpr) -> ScalarExpr {
        self.scalar(expr)
    }

    fn sequence(&mut self, kind: Placeholder) -> &mut u32 {
        match kind {
            Placeholder::Identifier => &mut self.identifier_sequence,
            Placeholder::StringLiteral => &mut self.string_sequence,
            Placeholder::PropertyName => &mut self.property_name_sequence,
            Placeholder::Parameter => &mut self.parameter_sequence,
        }
    }

    fn replace_string(&mut self, kind: Placeholder, value: &str) -> String {
        let length = value.chars().count();
        if length <= 1 || EXEMPT_STRINGS.contains(&value) {
            return value.to_string();
        }

        let key = (kind, value.to_string());
        if let Some(placeholder) = self.strings.get(&key) {
            return placeholder.clone();
        }

        let sequence = {
            let counter = self.sequence(kind);
            *counter += 1;
            *counter
        };
        let placeholder = if length < LONG_STRING {
            format!("{}{}", kind.prefix(), sequence)
        } else {
            format!("{}{}__{}", kind.prefix(), sequence, length)
        };

        self.strings.insert(key, placeholder.clone());
        placeholder
    }

    fn replace_number(&mut self, value: Number64) -> Number64 {
        if is_exempt_number(&value) {
            return value;
        }
        if let Some(replacement) = self.numbers.get(&value) {
            return *replacement;
        }

        self.number_sequence += 1;
        let v = value.to_double();
        let magnitude = 10f64.powf(v.abs().log10().floor());
        let jitter = magnitude * f64::from(self.number_sequence) / 10_000.0;
        let replacement = Number64::from_double(round_to_cents(v) + jitter);

        self.numbers.insert(value, replacement);
        replacement
    }

    fn identifier(&mut self, identifier: &Identifier) -> Identifier {
        Identifier::new(self.replace_string(Placeholder::Identifier, identifier.as_str()))
    }

    fn property_name(&mut self, name: &PropertyName) -> PropertyName {
        PropertyName::new(self.replace_string(Placeholder::PropertyName, name.as_str()))
    }

    /// Exemptions and lengths apply to the full `@name`, so `@id` is
    /// replaced. The placeholder gets its `@` back.
    fn parameter(&mut self, parameter: &Parameter) -> Parameter {
        Parameter::new(self.replace_string(Placeholder::Parameter, parameter.as_str()))
    }

    fn query(&mut self, query: &Query) -> Query {
        Query {
            select: self.select_clause(&query.select),
            from: query.from.as_ref().map(|from| FromClause {
                expr: self.collection_expr(&from.expr),
            }),
            where_clause: query.where_clause.as_ref().map(|w| WhereClause {
                expr: self.scalar(&w.expr),
            }),
            group_by: query.group_by.as_ref().map(|g| GroupByClause {
                exprs: self.scalars(&g.exprs),
            }),
            order_by: query.order_by.as_ref().map(|o| OrderByClause {
                items: o
                    .items
                    .iter()
                    .map(|item| OrderByItem {
                        expr: self.scalar(&item.expr),
                        descending: item.descending,
                    })
                    .collect(),
            }),
            offset_limit: query.offset_limit.as_ref().map(|_| OffsetLimitClause {
                offset: OffsetSpec { expr: zero() },
                limit: LimitSpec { expr: zero() },
            }),
        }
    }

    fn select_clause(&mut self, select: &SelectClause) -> SelectClause {
        let spec = match &select.spec {
            SelectSpec::Star => SelectSpec::Star,
            SelectSpec::Value(expr) => SelectSpec::Value(self.scalar(expr)),
            SelectSpec::List(items) => SelectSpec::List(
                items
                    .iter()
                    .map(|item| SelectItem {
                        expr: self.scalar(&item.expr),
                        alias: item.alias.as_ref().map(|a| self.identifier(a)),
                    })
                    .collect(),
            ),
        };

        SelectClause {
            spec,
            top: select.top.as_ref().map(|_| TopSpec { expr: zero() }),
            distinct: select.distinct,
        }
    }

    fn collection_expr(&mut self, expr: &CollectionExpr) -> CollectionExpr {
        match expr {
            CollectionExpr::Aliased { collection, alias } => CollectionExpr::Aliased {
                collection: self.collection(collection),
                alias: alias.as_ref().map(|a| self.identifier(a)),
            },
            CollectionExpr::ArrayIterator { alias, collection } => CollectionExpr::ArrayIterator {
                alias: self.identifier(alias),
                collection: self.collection(collection),
            },
            CollectionExpr::Join { left, right } => CollectionExpr::Join {
                left: Box::new(self.collection_expr(left)),
                right: Box::new(self.collection_expr(right)),
            },
        }
    }

    fn collection(&mut self, collection: &Collection) -> Collection {
        match collection {
            Collection::InputPath {
                input,
                relative_path,
            } => Collection::InputPath {
                input: self.identifier(input),
                relative_path: relative_path.as_ref().map(|p| self.path(p)),
            },
            Collection::Subquery(query) => Collection::Subquery(Box::new(self.query(query))),
            Collection::LiteralArray(items) => Collection::LiteralArray(self.scalars(items)),
        }
    }

    fn path(&mut self, path: &PathExpr) -> PathExpr {
        let parent = path.parent().map(|p| Box::new(self.path(p)));
        match path {
            PathExpr::Identifier { value, .. } => PathExpr::Identifier {
                parent,
                value: self.identifier(value),
            },
            PathExpr::Number { value, .. } => PathExpr::Number {
                parent,
                value: self.replace_number(*value),
            },
            PathExpr::String { value, .. } => PathExpr::String {
                parent,
                value: self.replace_string(Placeholder::StringLiteral, value),
            },
        }
    }

    fn scalars(&mut self, exprs: &[ScalarExpr]) -> Vec<ScalarExpr> {
        exprs.iter().map(|e| self.scalar(e)).collect()
    }

    fn boxed(&mut self, expr: &ScalarExpr) -> Box<ScalarExpr> {
        Box::new(self.scalar(expr))
    }

    fn scalar(&mut self, expr: &ScalarExpr) -> ScalarExpr {
        match expr {
            ScalarExpr::Literal(literal) => ScalarExpr::Literal(match literal.as_ref() {
                Literal::Number(n) => Literal::number(self.replace_number(*n)),
                Literal::String(s) => {
                    Literal::string(self.replace_string(Placeholder::StringLiteral, s))
                }
                Literal::Null | Literal::Undefined | Literal::Boolean(_) => literal.clone(),
            }),

            ScalarExpr::Unary { op, expr } => ScalarExpr::Unary {
                op: *op,
                expr: self.boxed(expr),
            },

            ScalarExpr::Binary { op, left, right } => ScalarExpr::Binary {
                op: *op,
                left: self.boxed(left),
                right: self.boxed(right),
            },

            ScalarExpr::Between {
                expr,
                low,
                high,
                not,
            } => ScalarExpr::Between {
                expr: self.boxed(expr),
                low: self.boxed(low),
                high: self.boxed(high),
                not: *not,
            },

            ScalarExpr::Conditional {
                condition,
                consequent,
                alternative,
            } => ScalarExpr::Conditional {
                condition: self.boxed(condition),
                consequent: self.boxed(consequent),
                alternative: self.boxed(alternative),
            },

            ScalarExpr::Coalesce { left, right } => ScalarExpr::Coalesce {
                left: self.boxed(left),
                right: self.boxed(right),
            },

            ScalarExpr::In { expr, items, not } => ScalarExpr::In {
                expr: self.boxed(expr),
                items: self.scalars(items),
                not: *not,
            },

            ScalarExpr::Exists(query) => ScalarExpr::Exists(Box::new(self.query(query))),
            ScalarExpr::ArrayOfQuery(query) => {
                ScalarExpr::ArrayOfQuery(Box::new(self.query(query)))
            }
            ScalarExpr::Subquery(query) => ScalarExpr::Subquery(Box::new(self.query(query))),

            // Function names are part of the language, not the data.
            ScalarExpr::FunctionCall { name, udf, args } => ScalarExpr::FunctionCall {
                name: name.clone(),
                udf: *udf,
                args: self.scalars(args),
            },

            ScalarExpr::MemberIndexer { member, index } => ScalarExpr::MemberIndexer {
                member: self.boxed(member),
                index: self.boxed(index),
            },

            ScalarExpr::PropertyRef { member, identifier } => ScalarExpr::PropertyRef {
                member: member.as_ref().map(|m| self.boxed(m)),
                identifier: self.identifier(identifier),
            },

            ScalarExpr::ParameterRef(parameter) => ScalarExpr::ParameterRef(self.parameter(parameter)),

            ScalarExpr::ArrayCreate(items) => ScalarExpr::ArrayCreate(self.scalars(items)),

            ScalarExpr::ObjectCreate(properties) => ScalarExpr::ObjectCreate(
                properties
                    .iter()
                    .map(|p| ObjectProperty {
                        name: self.property_name(&p.name),
                        expr: self.scalar(&p.expr),
                    })
                    .collect(),
            ),
        }
    }
}

/// Numbers too small or too special to identify anything.
fn is_exempt_number(value: &Number64) -> bool {
    if value.is_nan() || value.is_infinity() {
        return true;
    }
    if value.is_integer() {
        let i = value.to_integer();
        return i == i64::MIN || i.abs() < 100;
    }
    let d = value.to_double();
    // Machine epsilon, not the smallest subnormal.
    (d.abs() < 100.0 && d.fract() == 0.0) || d.abs() <= f64::EPSILON
}

/// Rounds to two decimal places, halves to even.
fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

fn zero() -> ScalarExpr {
    ScalarExpr::number(0i64)
}
