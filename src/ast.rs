//! # Query Abstract Syntax Tree
//!
//! This module defines the AST for the document-store SQL dialect: a
//! SQL-like language that queries schemaless JSON documents.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Binary and unary operators plus the precedence ladder
//! - **[literals]** - Literal values and their interned pools
//! - **[expressions]** - Scalar expressions and name nodes
//! - **[collections]** - `FROM` operands, collections and paths
//! - **[clauses]** - `SELECT`, `WHERE`, `GROUP BY`, `ORDER BY`, `OFFSET/LIMIT`
//! - **[query]** - The complete query
//! - **[kind]** - The closed set of node kinds
//!
//! ## Quick Start
//!
//! ```text
//! SELECT c.name, c.age FROM c WHERE c.age > 21 ORDER BY c.age DESC
//! ```
//!
//! ## Core Concepts
//!
//! ### Clause Structure
//!
//! Only `SELECT` is required. The other clauses appear in a fixed order:
//!
//! ```text
//! SELECT ... FROM ... WHERE ... GROUP BY ... ORDER BY ... OFFSET n LIMIT m
//! ```
//!
//! ### Collections
//!
//! A `FROM` operand is an aliased collection (`c.children AS ch`), an array
//! iterator (`ch IN c.children`), or a left-nested `JOIN` of two operands.
//!
//! ### Trees Are Immutable
//!
//! Nodes are built once by the parser or by a transform and never mutated.
//! Transforms such as obfuscation return a new tree. Literals are the only
//! shared nodes: small numbers, booleans, `null` and `undefined` come from
//! pools built on first use.
//!
//! ## Examples
//!
//! ### Array Iteration
//!
//! ```text
//! SELECT VALUE t FROM c JOIN t IN c.tags WHERE t != 'internal'
//! ```
//!
//! ### Subqueries
//!
//! ```text
//! SELECT c.id, ARRAY(SELECT VALUE ch.name FROM ch IN c.children) AS names FROM c
//! ```
//!
//! ### Parameters
//!
//! ```text
//! SELECT TOP @n * FROM c WHERE c.city = @city
//! ```
pub mod tokens;
pub mod operators;
pub mod literals;
pub mod expressions;
pub mod collections;
pub mod clauses;
pub mod query;
pub mod kind;

pub use tokens::Token;
pub use operators::{BinaryOp, Precedence, UnaryOp};
pub use literals::Literal;
pub use expressions::{Identifier, ObjectProperty, Parameter, PropertyName, ScalarExpr};
pub use collections::{Collection, CollectionExpr, PathExpr};
pub use clauses::{
    FromClause, GroupByClause, LimitSpec, OffsetLimitClause, OffsetSpec, OrderByClause,
    OrderByItem, SelectClause, SelectItem, SelectSpec, TopSpec, WhereClause,
};
pub use query::Query;
pub use kind::NodeKind;
