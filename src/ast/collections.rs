use crate::ast::expressions::{Identifier, ScalarExpr};
use crate::ast::query::Query;
use crate::number::Number64;

/// Operand of a `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionExpr {
    /// A collection with an optional alias
    ///
    /// # Examples
    /// ```text
    /// c
    /// c.children AS child
    /// (SELECT * FROM c) s
    /// ```
    Aliased {
        collection: Collection,
        alias: Option<Identifier>,
    },

    /// Binds each element of a collection to `alias`
    ///
    /// # Examples
    /// ```text
    /// child IN c.children
    /// ```
    ArrayIterator {
        alias: Identifier,
        collection: Collection,
    },

    /// `left JOIN right`; chains nest to the left
    Join {
        left: Box<CollectionExpr>,
        right: Box<CollectionExpr>,
    },
}

/// Source of documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    /// Root input or a path inside it (`c`, `c.tags[0]`)
    InputPath {
        input: Identifier,
        relative_path: Option<PathExpr>,
    },
    /// `(SELECT ...)`
    Subquery(Box<Query>),
    /// `[1, 2, 3]`
    LiteralArray(Vec<ScalarExpr>),
}

/// Path below an input identifier, stored innermost segment last.
///
/// `c.a[2]['b']` becomes `String { parent: Number { parent: Identifier a, 2 }, "b" }`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathExpr {
    Identifier {
        parent: Option<Box<PathExpr>>,
        value: Identifier,
    },
    Number {
        parent: Option<Box<PathExpr>>,
        value: Number64,
    },
    String {
        parent: Option<Box<PathExpr>>,
        value: String,
    },
}

impl PathExpr {
    pub fn parent(&self) -> Option<&PathExpr> {
        match self {
            PathExpr::Identifier { parent, .. }
            | PathExpr::Number { parent, .. }
            | PathExpr::String { parent, .. } => parent.as_deref(),
        }
    }
}
