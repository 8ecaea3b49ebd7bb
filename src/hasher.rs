//! Structural hashing for plan-cache keys.
//!
//! Every node folds a fixed per-kind salt together with the hashes of its
//! children, left to right, through an order-sensitive combiner. Trees with
//! the same shape, operators and leaf values hash equal. Non-strict mode sums
//! the hashes of select items and object properties instead, so reordering
//! them keeps the digest.

use log::trace;

use crate::ast::{
    BinaryOp, Collection, CollectionExpr, FromClause, GroupByClause, Identifier, LimitSpec,
    Literal, NodeKind, ObjectProperty, OffsetLimitClause, OffsetSpec, OrderByClause, OrderByItem,
    Parameter, PathExpr, PropertyName, Query, ScalarExpr, SelectClause, SelectItem, SelectSpec,
    TopSpec, UnaryOp, WhereClause,
};
use crate::number::Number64;

const TRUE_SALT: i32 = 1545461565;
const FALSE_SALT: i32 = -2072875075;
const BETWEEN_NOT_SALT: i32 = -1283200473;
const IN_NOT_SALT: i32 = -1131398119;
const UDF_SALT: i32 = 1547906315;
const DISTINCT_SALT: i32 = 1467616881;
const ASCENDING_SALT: i32 = -1123129997;
const DESCENDING_SALT: i32 = -703648622;

/// Seed contributed by each node kind.
fn kind_salt(kind: NodeKind) -> i32 {
    match kind {
        NodeKind::Query => 1968642960,
        NodeKind::SelectClause => 19731870,
        NodeKind::SelectStar => -1125875092,
        NodeKind::SelectList => -1704039197,
        NodeKind::SelectValue => 507077368,
        NodeKind::SelectItem => -611151157,
        NodeKind::TopSpec => -791376698,
        NodeKind::FromClause => 52588336,
        NodeKind::AliasedCollectionExpr => 1202039781,
        NodeKind::ArrayIteratorCollectionExpr => -468874086,
        NodeKind::JoinCollectionExpr => 1000382226,
        NodeKind::InputPathCollection => -209963066,
        NodeKind::SubqueryCollection => 1175697100,
        NodeKind::LiteralArrayCollection => 1634639566,
        NodeKind::IdentifierPathExpr => -1445813508,
        NodeKind::NumberPathExpr => 874210976,
        NodeKind::StringPathExpr => -1280625326,
        NodeKind::WhereClause => -516465563,
        NodeKind::GroupByClause => 130396242,
        NodeKind::OrderByClause => 1361708336,
        NodeKind::OrderByItem => 846566057,
        NodeKind::OffsetLimitClause => 150154755,
        NodeKind::OffsetSpec => 109062001,
        NodeKind::LimitSpec => 92601316,
        NodeKind::LiteralScalar => -158339101,
        NodeKind::UnaryScalar => 723832597,
        NodeKind::BinaryScalar => 1667146665,
        NodeKind::BetweenScalar => -943872277,
        NodeKind::ConditionalScalar => -421337832,
        NodeKind::CoalesceScalar => -1400659633,
        NodeKind::InScalar => 1439386783,
        NodeKind::ExistsScalar => 1168675587,
        NodeKind::FunctionCallScalar => 496783446,
        NodeKind::MemberIndexerScalar => 1589675618,
        NodeKind::PropertyRefScalar => -1586896865,
        NodeKind::ParameterRefScalar => 1446117758,
        NodeKind::ArrayCreateScalar => 1760950661,
        NodeKind::ArrayScalar => -1093553293,
        NodeKind::ObjectCreateScalar => -131129165,
        NodeKind::SubqueryScalar => -1327458193,
        NodeKind::NullLiteral => -709456592,
        NodeKind::UndefinedLiteral => 1290712518,
        NodeKind::BooleanLiteral => 739161617,
        NodeKind::NumberLiteral => 159836309,
        NodeKind::StringLiteral => -1542874155,
        NodeKind::Identifier => -1664307981,
        NodeKind::Parameter => -1853999792,
        NodeKind::PropertyName => 1262661966,
        NodeKind::ObjectProperty => 1218972715,
    }
}

fn binary_salt(op: BinaryOp) -> i32 {
    match op {
        BinaryOp::Add => 977447154,
        BinaryOp::And => -539169937,
        BinaryOp::BitwiseAnd => 192594476,
        BinaryOp::BitwiseOr => -1494193777,
        BinaryOp::BitwiseXor => 140893802,
        BinaryOp::Coalesce => -461857726,
        BinaryOp::Divide => -1486745780,
        BinaryOp::Equal => -69389992,
        BinaryOp::GreaterThan => 1643533106,
        BinaryOp::GreaterThanOrEqual => 180538014,
        BinaryOp::LessThan => -1452081072,
        BinaryOp::LessThanOrEqual => -1068434012,
        BinaryOp::Modulo => -371220256,
        BinaryOp::Multiply => -178990484,
        BinaryOp::NotEqual => 65181046,
        BinaryOp::Or => -2095255335,
        BinaryOp::StringConcat => -525384764,
        BinaryOp::Subtract => 2070749634,
    }
}

fn unary_salt(op: UnaryOp) -> i32 {
    match op {
        UnaryOp::BitwiseNot => 1177827907,
        UnaryOp::Not => 1278008063,
        UnaryOp::Minus => -1942284846,
        UnaryOp::Plus => 251767493,
    }
}

/// Order-sensitive mix of two hashes.
fn combine(lhs: i32, rhs: i32) -> i32 {
    let lhs = i64::from(lhs);
    let rhs = i64::from(rhs);
    let mixed = lhs
        ^ rhs
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(lhs << 6)
            .wrapping_add(lhs >> 2);
    mixed as i32
}

/// djb2 over the UTF-8 bytes of `s`.
fn string_hash(s: &str) -> i32 {
    let mut hash: u64 = 5381;
    for byte in s.bytes() {
        hash = (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte));
    }
    hash as i32
}

fn number_hash(n: &Number64) -> i32 {
    n.hash32() as i32
}

/// Computes structural digests of AST nodes.
#[derive(Debug, Clone, Copy)]
pub struct StructuralHasher {
    strict: bool,
}

impl StructuralHasher {
    pub fn new(strict: bool) -> Self {
        StructuralHasher { strict }
    }

    pub fn strict() -> Self {
        Self::new(true)
    }

    pub fn non_strict() -> Self {
        Self::new(false)
    }

    pub fn hash_query(&self, query: &Query) -> u32 {
        let hash = self.query(query) as u32;
        trace!("structural hash (strict: {}) = {:#010x}", self.strict, hash);
        hash
    }

    pub fn hash_scalar(&self, expr: &ScalarExpr) -> u32 {
        self.scalar(expr) as u32
    }

    /// Folds the hashes of `items`: in order when strict, as a sum otherwise.
    fn fold_unordered<T>(&self, mut hash: i32, items: &[T], item: impl Fn(&T) -> i32) -> i32 {
        for value in items {
            if self.strict {
                hash = combine(hash, item(value));
            } else {
                hash = hash.wrapping_add(item(value));
            }
        }
        hash
    }

    fn fold<T>(&self, mut hash: i32, items: &[T], item: impl Fn(&T) -> i32) -> i32 {
        for value in items {
            hash = combine(hash, item(value));
        }
        hash
    }

    fn query(&self, query: &Query) -> i32 {
        let mut hash = kind_salt(query.kind());
        hash = combine(hash, self.select_clause(&query.select));
        if let Some(from) = &query.from {
            hash = combine(hash, self.from_clause(from));
        }
        if let Some(where_clause) = &query.where_clause {
            hash = combine(hash, self.where_clause(where_clause));
        }
        if let Some(group_by) = &query.group_by {
            hash = combine(hash, self.group_by(group_by));
        }
        if let Some(order_by) = &query.order_by {
            hash = combine(hash, self.order_by(order_by));
        }
        if let Some(offset_limit) = &query.offset_limit {
            hash = combine(hash, self.offset_limit(offset_limit));
        }
        hash
    }

    fn select_clause(&self, select: &SelectClause) -> i32 {
        let mut hash = kind_salt(select.kind());
        if select.distinct {
            hash = combine(hash, DISTINCT_SALT);
        }
        if let Some(top) = &select.top {
            hash = combine(hash, self.top(top));
        }
        combine(hash, self.select_spec(&select.spec))
    }

    fn select_spec(&self, spec: &SelectSpec) -> i32 {
        let hash = kind_salt(spec.kind());
        match spec {
            SelectSpec::Star => hash,
            SelectSpec::List(items) => self.fold_unordered(hash, items, |i| self.select_item(i)),
            SelectSpec::Value(expr) => combine(hash, self.scalar(expr)),
        }
    }

    fn select_item(&self, item: &SelectItem) -> i32 {
        let mut hash = combine(kind_salt(item.kind()), self.scalar(&item.expr));
        if let Some(alias) = &item.alias {
            hash = combine(hash, self.identifier(alias));
        }
        hash
    }

    fn top(&self, top: &TopSpec) -> i32 {
        combine(kind_salt(top.kind()), self.scalar(&top.expr))
    }

    fn from_clause(&self, from: &FromClause) -> i32 {
        combine(kind_salt(from.kind()), self.collection_expr(&from.expr))
    }

    fn collection_expr(&self, expr: &CollectionExpr) -> i32 {
        let hash = kind_salt(expr.kind());
        match expr {
            CollectionExpr::Aliased { collection, alias } => {
                let hash = combine(hash, self.collection(collection));
                match alias {
                    Some(alias) => combine(hash, self.identifier(alias)),
                    None => hash,
                }
            }
            CollectionExpr::ArrayIterator { alias, collection } => {
                let hash = combine(hash, self.identifier(alias));
                combine(hash, self.collection(collection))
            }
            CollectionExpr::Join { left, right } => {
                let hash = combine(hash, self.collection_expr(left));
                combine(hash, self.collection_expr(right))
            }
        }
    }

    fn collection(&self, collection: &Collection) -> i32 {
        let hash = kind_salt(collection.kind());
        match collection {
            Collection::InputPath {
                input,
                relative_path,
            } => {
                let hash = combine(hash, self.identifier(input));
                match relative_path {
                    Some(path) => combine(hash, self.path(path)),
                    None => hash,
                }
            }
            Collection::Subquery(query) => combine(hash, self.query(query)),
            Collection::LiteralArray(items) => self.fold(hash, items, |e| self.scalar(e)),
        }
    }

    fn path(&self, path: &PathExpr) -> i32 {
        let mut hash = kind_salt(path.kind());
        if let Some(parent) = path.parent() {
            hash = combine(hash, self.path(parent));
        }
        match path {
            PathExpr::Identifier { value, .. } => combine(hash, self.identifier(value)),
            PathExpr::Number { value, .. } => combine(hash, self.number_literal(value)),
            PathExpr::String { value, .. } => combine(hash, self.string_literal(value)),
        }
    }

    fn where_clause(&self, where_clause: &WhereClause) -> i32 {
        combine(kind_salt(where_clause.kind()), self.scalar(&where_clause.expr))
    }

    fn group_by(&self, group_by: &GroupByClause) -> i32 {
        self.fold(kind_salt(group_by.kind()), &group_by.exprs, |e| self.scalar(e))
    }

    fn order_by(&self, order_by: &OrderByClause) -> i32 {
        self.fold(kind_salt(order_by.kind()), &order_by.items, |i| {
            self.order_by_item(i)
        })
    }

    fn order_by_item(&self, item: &OrderByItem) -> i32 {
        let hash = combine(kind_salt(item.kind()), self.scalar(&item.expr));
        if item.descending {
            combine(hash, DESCENDING_SALT)
        } else {
            combine(hash, ASCENDING_SALT)
        }
    }

    fn offset_limit(&self, clause: &OffsetLimitClause) -> i32 {
        let hash = combine(kind_salt(clause.kind()), self.offset(&clause.offset));
        combine(hash, self.limit(&clause.limit))
    }

    fn offset(&self, offset: &OffsetSpec) -> i32 {
        combine(kind_salt(offset.kind()), self.scalar(&offset.expr))
    }

    fn limit(&self, limit: &LimitSpec) -> i32 {
        combine(kind_salt(limit.kind()), self.scalar(&limit.expr))
    }

    fn scalar(&self, expr: &ScalarExpr) -> i32 {
        let hash = kind_salt(expr.kind());
        match expr {
            ScalarExpr::Literal(literal) => combine(hash, self.literal(literal)),

            ScalarExpr::Unary { op, expr } => {
                let hash = combine(hash, unary_salt(*op));
                combine(hash, self.scalar(expr))
            }

            ScalarExpr::Binary { op, left, right } => {
                let hash = combine(hash, self.scalar(left));
                let hash = combine(hash, binary_salt(*op));
                combine(hash, self.scalar(right))
            }

            ScalarExpr::Between {
                expr,
                low,
                high,
                not,
            } => {
                let mut hash = combine(hash, self.scalar(expr));
                if *not {
                    hash = combine(hash, BETWEEN_NOT_SALT);
                }
                let hash = combine(hash, self.scalar(low));
                combine(hash, self.scalar(high))
            }

            ScalarExpr::Conditional {
                condition,
                consequent,
                alternative,
            } => {
                let hash = combine(hash, self.scalar(condition));
                let hash = combine(hash, self.scalar(consequent));
                combine(hash, self.scalar(alternative))
            }

            ScalarExpr::Coalesce { left, right } => {
                let hash = combine(hash, self.scalar(left));
                combine(hash, self.scalar(right))
            }

            ScalarExpr::In { expr, items, not } => {
                let mut hash = combine(hash, self.scalar(expr));
                if *not {
                    hash = combine(hash, IN_NOT_SALT);
                }
                self.fold(hash, items, |e| self.scalar(e))
            }

            ScalarExpr::Exists(query)
            | ScalarExpr::ArrayOfQuery(query)
            | ScalarExpr::Subquery(query) => combine(hash, self.query(query)),

            ScalarExpr::FunctionCall { name, udf, args } => {
                let mut hash = hash;
                if *udf {
                    hash = combine(hash, UDF_SALT);
                }
                let hash = combine(hash, self.identifier(name));
                self.fold(hash, args, |e| self.scalar(e))
            }

            ScalarExpr::MemberIndexer { member, index } => {
                let hash = combine(hash, self.scalar(member));
                combine(hash, self.scalar(index))
            }

            ScalarExpr::PropertyRef { member, identifier } => {
                let hash = combine(hash, self.identifier(identifier));
                match member {
                    Some(member) => combine(hash, self.scalar(member)),
                    None => hash,
                }
            }

            ScalarExpr::ParameterRef(parameter) => combine(hash, self.parameter(parameter)),

            ScalarExpr::ArrayCreate(items) => self.fold(hash, items, |e| self.scalar(e)),

            ScalarExpr::ObjectCreate(properties) => {
                self.fold_unordered(hash, properties, |p| self.object_property(p))
            }
        }
    }

    fn object_property(&self, property: &ObjectProperty) -> i32 {
        let hash = combine(kind_salt(property.kind()), self.property_name(&property.name));
        combine(hash, self.scalar(&property.expr))
    }

    fn literal(&self, literal: &Literal) -> i32 {
        let hash = kind_salt(literal.kind());
        match literal {
            Literal::Null | Literal::Undefined => hash,
            Literal::Boolean(true) => combine(hash, TRUE_SALT),
            Literal::Boolean(false) => combine(hash, FALSE_SALT),
            Literal::Number(n) => combine(hash, number_hash(n)),
            Literal::String(s) => combine(hash, string_hash(s)),
        }
    }

    fn number_literal(&self, n: &Number64) -> i32 {
        combine(kind_salt(NodeKind::NumberLiteral), number_hash(n))
    }

    fn string_literal(&self, s: &str) -> i32 {
        combine(kind_salt(NodeKind::StringLiteral), string_hash(s))
    }

    fn identifier(&self, identifier: &Identifier) -> i32 {
        combine(kind_salt(identifier.kind()), string_hash(identifier.as_str()))
    }

    fn parameter(&self, parameter: &Parameter) -> i32 {
        combine(kind_salt(parameter.kind()), string_hash(parameter.as_str()))
    }

    fn property_name(&self, name: &PropertyName) -> i32 {
        combine(kind_salt(name.kind()), string_hash(name.as_str()))
    }
}
