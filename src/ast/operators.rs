/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,

    // Bitwise
    /// Bitwise AND (`&`)
    BitwiseAnd,
    /// Bitwise OR (`|`)
    BitwiseOr,
    /// Bitwise XOR (`^`)
    BitwiseXor,

    // Comparison
    /// Equal (`=`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessThanOrEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqual,

    // Logical
    /// Logical AND (`AND`)
    And,
    /// Logical OR (`OR`)
    Or,

    /// String concatenation (`||`)
    StringConcat,
    /// Null-coalescing (`??`)
    Coalesce,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::BitwiseXor => "^",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::StringConcat => "||",
            BinaryOp::Coalesce => "??",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => Precedence::Multiplicative,
            BinaryOp::Add | BinaryOp::Subtract => Precedence::Additive,
            BinaryOp::LessThan
            | BinaryOp::LessThanOrEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterThanOrEqual => Precedence::Relational,
            BinaryOp::Equal | BinaryOp::NotEqual => Precedence::Equality,
            BinaryOp::BitwiseAnd => Precedence::BitwiseAnd,
            BinaryOp::BitwiseXor => Precedence::BitwiseXor,
            BinaryOp::BitwiseOr => Precedence::BitwiseOr,
            BinaryOp::And => Precedence::And,
            BinaryOp::Or => Precedence::Or,
            BinaryOp::StringConcat => Precedence::StringConcat,
            BinaryOp::Coalesce => Precedence::Coalesce,
        }
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Bitwise NOT (`~`)
    BitwiseNot,
    /// Negation (`-`)
    Minus,
    /// Logical NOT (`NOT`)
    Not,
    /// Identity (`+`)
    Plus,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::BitwiseNot => "~",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "NOT",
            UnaryOp::Plus => "+",
        }
    }
}

/// Precedence ladder of scalar expressions, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Conditional,
    Coalesce,
    StringConcat,
    Or,
    And,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    /// Comparisons plus `BETWEEN` and `IN`
    Relational,
    Additive,
    Multiplicative,
    Unary,
    /// Literals, references, calls and postfix access
    Primary,
}

impl Precedence {
    /// The next tighter level.
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Conditional => Precedence::Coalesce,
            Precedence::Coalesce => Precedence::StringConcat,
            Precedence::StringConcat => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::BitwiseOr,
            Precedence::BitwiseOr => Precedence::BitwiseXor,
            Precedence::BitwiseXor => Precedence::BitwiseAnd,
            Precedence::BitwiseAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary | Precedence::Primary => Precedence::Primary,
        }
    }
}
