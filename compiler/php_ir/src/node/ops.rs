//! Semantic operator kinds carried by executable nodes.
//!
//! One `Binary` node kind carries a `BinaryOp` tag; the evaluator
//! dispatches on the tag with an exhaustive match.

/// Binary operators the core can execute.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical (short-circuit)
    And,
    Or,

    // Shift
    Shl,
    Shr,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    /// Whether the right operand may be skipped.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Unary operators the core can execute.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x` (numeric identity)
    Plus,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
        }
    }
}

/// Whether an increment/decrement yields the new or the original value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Fixity {
    /// `++$x`: yields the updated value.
    Prefix,
    /// `$x++`: yields the value before the update.
    Postfix,
}
