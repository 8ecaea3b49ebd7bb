use crate::ast::collections::CollectionExpr;
use crate::ast::expressions::{Identifier, ScalarExpr};

/// `SELECT [DISTINCT] [TOP n] spec`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectClause {
    pub spec: SelectSpec,
    pub top: Option<TopSpec>,
    pub distinct: bool,
}

/// What a `SELECT` projects.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectSpec {
    /// `*`
    Star,
    /// One or more items, `SELECT c.id, c.name AS n`
    List(Vec<SelectItem>),
    /// `SELECT VALUE expr`
    Value(ScalarExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: ScalarExpr,
    pub alias: Option<Identifier>,
}

/// Count expression of `TOP`: a number literal or a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TopSpec {
    pub expr: ScalarExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub expr: CollectionExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub expr: ScalarExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub exprs: Vec<ScalarExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub items: Vec<OrderByItem>,
}

/// Sort key; `ASC` is the default and is not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: ScalarExpr,
    pub descending: bool,
}

/// `OFFSET n LIMIT m`
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetLimitClause {
    pub offset: OffsetSpec,
    pub limit: LimitSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OffsetSpec {
    pub expr: ScalarExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitSpec {
    pub expr: ScalarExpr,
}
