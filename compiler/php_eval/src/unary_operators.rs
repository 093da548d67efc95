//! Unary operator implementations.

use php_ir::{BinaryOp, UnaryOp};

use crate::errors::invalid_unary_op;
use crate::operators::evaluate_binary;
use crate::value::{int_to_float, Number, Value};
use crate::EvalResult;

/// Evaluate a unary operation.
///
/// Both operators coerce to a number first (`null` is 0, booleans 0/1);
/// arrays are rejected.
#[expect(
    clippy::needless_pass_by_value,
    reason = "mirrors evaluate_binary; callers hand over the evaluated operand"
)]
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult {
    let Some(number) = value.to_number() else {
        return Err(invalid_unary_op(op, value.type_name()));
    };
    match op {
        UnaryOp::Neg => Ok(match number {
            Number::Int(n) => n
                .checked_neg()
                .map_or_else(|| Value::Float(-int_to_float(n)), Value::Int),
            Number::Float(f) => Value::Float(-f),
        }),
        UnaryOp::Plus => Ok(number.into()),
    }
}

/// Value after `++` (`delta` = 1) or `--` (`delta` = -1).
///
/// Follows addition: `null` counts as 0 and overflow promotes to float.
pub fn increment(value: Value, delta: i64) -> EvalResult {
    evaluate_binary(value, Value::Int(delta), BinaryOp::Add)
}
