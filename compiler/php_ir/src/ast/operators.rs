//! Surface operator codes as reported by the parser.
//!
//! These cover the parser's whole operator vocabulary. Which of them the
//! core can execute is decided by the operator tables in `php_lower`,
//! which map them onto the semantic kinds in [`crate::node`].

/// Infix (binary) operator tokens.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InfixOp {
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,

    // Comparison
    IsEqual,
    IsNotEqual,
    IsIdentical,
    IsNotIdentical,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    Spaceship,

    // Logical
    BoolAnd,
    BoolOr,
    BoolXor,
    /// Low-precedence `and`
    LogicalAnd,
    /// Low-precedence `or`
    LogicalOr,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,

    // Other
    Coalesce,
}

impl InfixOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Concat => ".",
            Self::IsEqual => "==",
            Self::IsNotEqual => "!=",
            Self::IsIdentical => "===",
            Self::IsNotIdentical => "!==",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::Spaceship => "<=>",
            Self::BoolAnd => "&&",
            Self::BoolOr => "||",
            Self::BoolXor => "xor",
            Self::LogicalAnd => "and",
            Self::LogicalOr => "or",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Coalesce => "??",
        }
    }
}

/// Assignment operator tokens (`=` and every compound form).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Equal,
    /// `=&` reference assignment
    Reference,
    PlusEqual,
    MinusEqual,
    MulEqual,
    DivEqual,
    ModEqual,
    PowEqual,
    ConcatEqual,
    AndEqual,
    OrEqual,
    XorEqual,
    ShiftLeftEqual,
    ShiftRightEqual,
    CoalesceEqual,
}

impl AssignOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::Reference => "=&",
            Self::PlusEqual => "+=",
            Self::MinusEqual => "-=",
            Self::MulEqual => "*=",
            Self::DivEqual => "/=",
            Self::ModEqual => "%=",
            Self::PowEqual => "**=",
            Self::ConcatEqual => ".=",
            Self::AndEqual => "&=",
            Self::OrEqual => "|=",
            Self::XorEqual => "^=",
            Self::ShiftLeftEqual => "<<=",
            Self::ShiftRightEqual => ">>=",
            Self::CoalesceEqual => "??=",
        }
    }
}

/// Prefix unary operator tokens.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOpCode {
    Plus,
    Minus,
    Not,
    Tilde,
}

impl UnaryOpCode {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::Tilde => "~",
        }
    }
}

/// Increment/decrement tokens, shared by prefix and postfix forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IncDecOp {
    Inc,
    Dec,
}

impl IncDecOp {
    /// The amount added to the variable.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Inc => 1,
            Self::Dec => -1,
        }
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }
}
