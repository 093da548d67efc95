//! Surface operator tokens to executable operator kinds.
//!
//! Three lookups: infix tokens, assignment tokens (plain or compound) and
//! prefix-unary tokens. `None` means the core has no implementation; the
//! compiler turns that into an unsupported-construct error.

use php_ir::{AssignOp, BinaryOp, InfixOp, UnaryOp, UnaryOpCode};

/// Operator kind for an infix token.
pub const fn binary_op(op: InfixOp) -> Option<BinaryOp> {
    Some(match op {
        InfixOp::Plus => BinaryOp::Add,
        InfixOp::Minus => BinaryOp::Sub,
        InfixOp::Mul => BinaryOp::Mul,
        InfixOp::Div => BinaryOp::Div,
        InfixOp::IsEqual => BinaryOp::Eq,
        InfixOp::IsNotEqual => BinaryOp::NotEq,
        InfixOp::Less => BinaryOp::Lt,
        InfixOp::Greater => BinaryOp::Gt,
        InfixOp::LessOrEqual => BinaryOp::LtEq,
        InfixOp::GreaterOrEqual => BinaryOp::GtEq,
        // `and`/`or` differ from `&&`/`||` only in precedence.
        InfixOp::BoolAnd | InfixOp::LogicalAnd => BinaryOp::And,
        InfixOp::BoolOr | InfixOp::LogicalOr => BinaryOp::Or,
        InfixOp::ShiftLeft => BinaryOp::Shl,
        InfixOp::ShiftRight => BinaryOp::Shr,
        InfixOp::Mod
        | InfixOp::Pow
        | InfixOp::Concat
        | InfixOp::IsIdentical
        | InfixOp::IsNotIdentical
        | InfixOp::Spaceship
        | InfixOp::BoolXor
        | InfixOp::BitAnd
        | InfixOp::BitOr
        | InfixOp::BitXor
        | InfixOp::Coalesce => return None,
    })
}

/// How an assignment token writes its target.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignKind {
    /// `target = value`
    Plain,
    /// `target op= value`, desugared to `target = target op value`.
    Compound(BinaryOp),
}

/// Assignment kind for an assignment token.
pub const fn assign_kind(op: AssignOp) -> Option<AssignKind> {
    Some(match op {
        AssignOp::Equal => AssignKind::Plain,
        AssignOp::PlusEqual => AssignKind::Compound(BinaryOp::Add),
        AssignOp::MinusEqual => AssignKind::Compound(BinaryOp::Sub),
        AssignOp::MulEqual => AssignKind::Compound(BinaryOp::Mul),
        AssignOp::DivEqual => AssignKind::Compound(BinaryOp::Div),
        AssignOp::ShiftLeftEqual => AssignKind::Compound(BinaryOp::Shl),
        AssignOp::ShiftRightEqual => AssignKind::Compound(BinaryOp::Shr),
        AssignOp::Reference
        | AssignOp::ModEqual
        | AssignOp::PowEqual
        | AssignOp::ConcatEqual
        | AssignOp::AndEqual
        | AssignOp::OrEqual
        | AssignOp::XorEqual
        | AssignOp::CoalesceEqual => return None,
    })
}

/// Operator kind for a prefix-unary token. Only `-` and `+` are supported.
pub const fn unary_op(op: UnaryOpCode) -> Option<UnaryOp> {
    match op {
        UnaryOpCode::Minus => Some(UnaryOp::Neg),
        UnaryOpCode::Plus => Some(UnaryOp::Plus),
        UnaryOpCode::Not | UnaryOpCode::Tilde => None,
    }
}
