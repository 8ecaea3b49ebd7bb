use std::sync::Arc;

use crate::ast::literals::Literal;
use crate::ast::operators::{BinaryOp, UnaryOp};
use crate::ast::query::Query;
use crate::number::Number64;

/// Scalar expression nodes.
///
/// Children are exclusively owned; only literals are shared, through the
/// pools behind [`Literal`]'s constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarExpr {
    /// Literal value
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 'hello'
    /// undefined
    /// ```
    Literal(Arc<Literal>),

    /// Prefix operator application
    ///
    /// # Examples
    /// ```text
    /// -42
    /// NOT c.active
    /// ~c.flags
    /// ```
    Unary { op: UnaryOp, expr: Box<ScalarExpr> },

    /// Infix operator application
    ///
    /// # Examples
    /// ```text
    /// c.age > 21
    /// c.first || ' ' || c.last
    /// ```
    Binary {
        op: BinaryOp,
        left: Box<ScalarExpr>,
        right: Box<ScalarExpr>,
    },

    /// Range test, both bounds inclusive
    ///
    /// # Examples
    /// ```text
    /// c.age BETWEEN 18 AND 65
    /// c.age NOT BETWEEN 18 AND 65
    /// ```
    Between {
        expr: Box<ScalarExpr>,
        low: Box<ScalarExpr>,
        high: Box<ScalarExpr>,
        not: bool,
    },

    /// Ternary conditional (`cond ? then : else`)
    Conditional {
        condition: Box<ScalarExpr>,
        consequent: Box<ScalarExpr>,
        alternative: Box<ScalarExpr>,
    },

    /// Null-coalescing (`left ?? right`)
    Coalesce {
        left: Box<ScalarExpr>,
        right: Box<ScalarExpr>,
    },

    /// Membership test against a non-empty list
    ///
    /// # Examples
    /// ```text
    /// c.state IN ('WA', 'OR')
    /// c.state NOT IN ('CA')
    /// ```
    In {
        expr: Box<ScalarExpr>,
        items: Vec<ScalarExpr>,
        not: bool,
    },

    /// `EXISTS(subquery)`
    Exists(Box<Query>),

    /// Built-in or user-defined function call
    ///
    /// # Examples
    /// ```text
    /// ABS(-123)
    /// PI()
    /// udf.tax(c.price)
    /// ```
    FunctionCall {
        name: Identifier,
        udf: bool,
        args: Vec<ScalarExpr>,
    },

    /// Bracket access (`member[index]`)
    MemberIndexer {
        member: Box<ScalarExpr>,
        index: Box<ScalarExpr>,
    },

    /// Property access (`member.identifier`), or a bare identifier when
    /// there is no member
    PropertyRef {
        member: Option<Box<ScalarExpr>>,
        identifier: Identifier,
    },

    /// `@name`
    ParameterRef(Parameter),

    /// Array construction (`[a, b]`)
    ArrayCreate(Vec<ScalarExpr>),

    /// `ARRAY(subquery)`
    ArrayOfQuery(Box<Query>),

    /// Object construction (`{"a": 1}`)
    ObjectCreate(Vec<ObjectProperty>),

    /// Parenthesized subquery used as a scalar
    Subquery(Box<Query>),
}

impl ScalarExpr {
    pub fn literal(literal: Arc<Literal>) -> Self {
        ScalarExpr::Literal(literal)
    }

    pub fn number(value: impl Into<Number64>) -> Self {
        ScalarExpr::Literal(Literal::number(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ScalarExpr::Literal(Literal::string(value))
    }

    pub fn unary(op: UnaryOp, expr: ScalarExpr) -> Self {
        ScalarExpr::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: BinaryOp, left: ScalarExpr, right: ScalarExpr) -> Self {
        ScalarExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Bare identifier reference such as `c`.
    pub fn identifier(name: impl Into<String>) -> Self {
        ScalarExpr::PropertyRef {
            member: None,
            identifier: Identifier::new(name),
        }
    }

    /// Property access such as `c.name`.
    pub fn property(member: ScalarExpr, name: impl Into<String>) -> Self {
        ScalarExpr::PropertyRef {
            member: Some(Box::new(member)),
            identifier: Identifier::new(name),
        }
    }
}

/// A case-sensitive name: input alias, property, function name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Query parameter name, always starting with `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter(String);

impl Parameter {
    /// Creates a parameter, adding the leading `@` when it is missing.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.starts_with('@') {
            Parameter(name)
        } else {
            Parameter(format!("@{}", name))
        }
    }

    /// Full name including the `@`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key of an object-construction property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyName(String);

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        PropertyName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `"name": expr` inside an object construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    pub name: PropertyName,
    pub expr: ScalarExpr,
}
