use crate::ast::clauses::{
    FromClause, GroupByClause, LimitSpec, OffsetLimitClause, OffsetSpec, OrderByClause,
    OrderByItem, SelectClause, SelectItem, SelectSpec, TopSpec, WhereClause,
};
use crate::ast::collections::{Collection, CollectionExpr, PathExpr};
use crate::ast::expressions::{Identifier, ObjectProperty, Parameter, PropertyName, ScalarExpr};
use crate::ast::literals::Literal;
use crate::ast::query::Query;

/// Tag identifying the kind of every AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Query,

    SelectClause,
    SelectStar,
    SelectList,
    SelectValue,
    SelectItem,
    TopSpec,

    FromClause,
    AliasedCollectionExpr,
    ArrayIteratorCollectionExpr,
    JoinCollectionExpr,
    InputPathCollection,
    SubqueryCollection,
    LiteralArrayCollection,

    IdentifierPathExpr,
    NumberPathExpr,
    StringPathExpr,

    WhereClause,
    GroupByClause,
    OrderByClause,
    OrderByItem,
    OffsetLimitClause,
    OffsetSpec,
    LimitSpec,

    LiteralScalar,
    UnaryScalar,
    BinaryScalar,
    BetweenScalar,
    ConditionalScalar,
    CoalesceScalar,
    InScalar,
    ExistsScalar,
    FunctionCallScalar,
    MemberIndexerScalar,
    PropertyRefScalar,
    ParameterRefScalar,
    ArrayCreateScalar,
    ArrayScalar,
    ObjectCreateScalar,
    SubqueryScalar,

    NullLiteral,
    UndefinedLiteral,
    BooleanLiteral,
    NumberLiteral,
    StringLiteral,

    Identifier,
    Parameter,
    PropertyName,
    ObjectProperty,
}

impl Query {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Query
    }
}

impl SelectClause {
    pub fn kind(&self) -> NodeKind {
        NodeKind::SelectClause
    }
}

impl SelectSpec {
    pub fn kind(&self) -> NodeKind {
        match self {
            SelectSpec::Star => NodeKind::SelectStar,
            SelectSpec::List(_) => NodeKind::SelectList,
            SelectSpec::Value(_) => NodeKind::SelectValue,
        }
    }
}

impl SelectItem {
    pub fn kind(&self) -> NodeKind {
        NodeKind::SelectItem
    }
}

impl TopSpec {
    pub fn kind(&self) -> NodeKind {
        NodeKind::TopSpec
    }
}

impl FromClause {
    pub fn kind(&self) -> NodeKind {
        NodeKind::FromClause
    }
}

impl CollectionExpr {
    pub fn kind(&self) -> NodeKind {
        match self {
            CollectionExpr::Aliased { .. } => NodeKind::AliasedCollectionExpr,
            CollectionExpr::ArrayIterator { .. } => NodeKind::ArrayIteratorCollectionExpr,
            CollectionExpr::Join { .. } => NodeKind::JoinCollectionExpr,
        }
    }
}

impl Collection {
    pub fn kind(&self) -> NodeKind {
        match self {
            Collection::InputPath { .. } => NodeKind::InputPathCollection,
            Collection::Subquery(_) => NodeKind::SubqueryCollection,
            Collection::LiteralArray(_) => NodeKind::LiteralArrayCollection,
        }
    }
}

impl PathExpr {
    pub fn kind(&self) -> NodeKind {
        match self {
            PathExpr::Identifier { .. } => NodeKind::IdentifierPathExpr,
            PathExpr::Number { .. } => NodeKind::NumberPathExpr,
            PathExpr::String { .. } => NodeKind::StringPathExpr,
        }
    }
}

impl WhereClause {
    pub fn kind(&self) -> NodeKind {
        NodeKind::WhereClause
    }
}

impl GroupByClause {
    pub fn kind(&self) -> NodeKind {
        NodeKind::GroupByClause
    }
}

impl OrderByClause {
    pub fn kind(&self) -> NodeKind {
        NodeKind::OrderByClause
    }
}

impl OrderByItem {
    pub fn kind(&self) -> NodeKind {
        NodeKind::OrderByItem
    }
}

impl OffsetLimitClause {
    pub fn kind(&self) -> NodeKind {
        NodeKind::OffsetLimitClause
    }
}

impl OffsetSpec {
    pub fn kind(&self) -> NodeKind {
        NodeKind::OffsetSpec
    }
}

impl LimitSpec {
    pub fn kind(&self) -> NodeKind {
        NodeKind::LimitSpec
    }
}

impl ScalarExpr {
    pub fn kind(&self) -> NodeKind {
        match self {
            ScalarExpr::Literal(_) => NodeKind::LiteralScalar,
            ScalarExpr::Unary { .. } => NodeKind::UnaryScalar,
            ScalarExpr::Binary { .. } => NodeKind::BinaryScalar,
            ScalarExpr::Between { .. } => NodeKind::BetweenScalar,
            ScalarExpr::Conditional { .. } => NodeKind::ConditionalScalar,
            ScalarExpr::Coalesce { .. } => NodeKind::CoalesceScalar,
            ScalarExpr::In { .. } => NodeKind::InScalar,
            ScalarExpr::Exists(_) => NodeKind::ExistsScalar,
            ScalarExpr::FunctionCall { .. } => NodeKind::FunctionCallScalar,
            ScalarExpr::MemberIndexer { .. } => NodeKind::MemberIndexerScalar,
            ScalarExpr::PropertyRef { .. } => NodeKind::PropertyRefScalar,
            ScalarExpr::ParameterRef(_) => NodeKind::ParameterRefScalar,
            ScalarExpr::ArrayCreate(_) => NodeKind::ArrayCreateScalar,
            ScalarExpr::ArrayOfQuery(_) => NodeKind::ArrayScalar,
            ScalarExpr::ObjectCreate(_) => NodeKind::ObjectCreateScalar,
            ScalarExpr::Subquery(_) => NodeKind::SubqueryScalar,
        }
    }
}

impl Literal {
    pub fn kind(&self) -> NodeKind {
        match self {
            Literal::Null => NodeKind::NullLiteral,
            Literal::Undefined => NodeKind::UndefinedLiteral,
            Literal::Boolean(_) => NodeKind::BooleanLiteral,
            Literal::Number(_) => NodeKind::NumberLiteral,
            Literal::String(_) => NodeKind::StringLiteral,
        }
    }
}

impl Identifier {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Identifier
    }
}

impl Parameter {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Parameter
    }
}

impl PropertyName {
    pub fn kind(&self) -> NodeKind {
        NodeKind::PropertyName
    }
}

impl ObjectProperty {
    pub fn kind(&self) -> NodeKind {
        NodeKind::ObjectProperty
    }
}
