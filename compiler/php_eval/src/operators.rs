//! Binary operator implementations.
//!
//! Direct enum dispatch on `BinaryOp`. Operands are coerced per operator
//! family: arithmetic goes through `Value::to_number`, shifts through
//! integer truncation, comparisons through [`loose_cmp`].

use std::cmp::Ordering;

use php_ir::BinaryOp;

use crate::errors::{binary_type_mismatch, division_by_zero, negative_shift, type_mismatch};
use crate::value::{int_to_float, Number, Value};
use crate::{EvalError, EvalResult};

/// Evaluate a binary operation on two already evaluated operands.
///
/// `And`/`Or` are accepted here for completeness, but the interpreter
/// short-circuits them before both operands exist.
#[expect(
    clippy::needless_pass_by_value,
    reason = "operands are consumed by the interpreter; references would force clones at call sites"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => eval_arithmetic(&left, &right, Arith::Add, op),
        BinaryOp::Sub => eval_arithmetic(&left, &right, Arith::Sub, op),
        BinaryOp::Mul => eval_arithmetic(&left, &right, Arith::Mul, op),
        BinaryOp::Div => eval_arithmetic(&left, &right, Arith::Div, op),
        BinaryOp::Eq => Ok(Value::Bool(loose_eq(&left, &right))),
        BinaryOp::NotEq => Ok(Value::Bool(!loose_eq(&left, &right))),
        BinaryOp::Lt => Ok(Value::Bool(loose_cmp(&left, &right) == Some(Ordering::Less))),
        BinaryOp::Gt => Ok(Value::Bool(
            loose_cmp(&left, &right) == Some(Ordering::Greater),
        )),
        BinaryOp::LtEq => Ok(Value::Bool(matches!(
            loose_cmp(&left, &right),
            Some(Ordering::Less | Ordering::Equal)
        ))),
        BinaryOp::GtEq => Ok(Value::Bool(matches!(
            loose_cmp(&left, &right),
            Some(Ordering::Greater | Ordering::Equal)
        ))),
        BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        BinaryOp::Shl => eval_shift(shift_operand(&left)?, shift_operand(&right)?, false),
        BinaryOp::Shr => eval_shift(shift_operand(&left)?, shift_operand(&right)?, true),
    }
}

#[derive(Copy, Clone, Debug)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
}

fn eval_arithmetic(left: &Value, right: &Value, arith: Arith, op: BinaryOp) -> EvalResult {
    match (left.to_number(), right.to_number()) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => eval_int_arithmetic(a, b, arith),
        (Some(a), Some(b)) => eval_float_arithmetic(a.as_f64(), b.as_f64(), arith),
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

/// Integer arithmetic; results that do not fit in `i64` promote to float.
fn eval_int_arithmetic(a: i64, b: i64, arith: Arith) -> EvalResult {
    let checked = match arith {
        Arith::Add => a.checked_add(b),
        Arith::Sub => a.checked_sub(b),
        Arith::Mul => a.checked_mul(b),
        Arith::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            // Only exact quotients stay integral. `i64::MIN % -1` is `None`
            // and promotes along with every inexact quotient.
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                _ => None,
            }
        }
    };
    match checked {
        Some(n) => Ok(Value::Int(n)),
        None => eval_float_arithmetic(int_to_float(a), int_to_float(b), arith),
    }
}

fn eval_float_arithmetic(a: f64, b: f64, arith: Arith) -> EvalResult {
    let result = match arith {
        Arith::Add => a + b,
        Arith::Sub => a - b,
        Arith::Mul => a * b,
        Arith::Div => {
            if b == 0.0 {
                return Err(division_by_zero());
            }
            a / b
        }
    };
    Ok(Value::Float(result))
}

fn shift_operand(value: &Value) -> Result<i64, EvalError> {
    value
        .to_number()
        .map(Number::as_i64)
        .ok_or_else(|| type_mismatch("int", value.type_name()))
}

fn eval_shift(value: i64, amount: i64, right: bool) -> EvalResult {
    if amount < 0 {
        return Err(negative_shift(amount));
    }
    let bits = u32::try_from(amount).ok().filter(|bits| *bits < i64::BITS);
    let result = match (bits, right) {
        (Some(bits), false) => value << bits,
        (Some(bits), true) => value >> bits,
        (None, false) => 0,
        // Shifting right past the width leaves only the sign.
        (None, true) => {
            if value < 0 {
                -1
            } else {
                0
            }
        }
    };
    Ok(Value::Int(result))
}

/// Loose equality.
fn loose_eq(left: &Value, right: &Value) -> bool {
    loose_cmp(left, right) == Some(Ordering::Equal)
}

/// Loose ordering shared by all comparison operators.
///
/// - a `bool` or `null` on either side compares both sides by truthiness
/// - numbers compare numerically
/// - arrays compare by length, then element by element
/// - an array is greater than any scalar
///
/// `None` means unordered (a NaN was involved).
fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(_) | Value::Null, _) | (_, Value::Bool(_) | Value::Null) => {
            Some(left.is_truthy().cmp(&right.is_truthy()))
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(a.len().cmp(&b.len()));
            }
            for (x, y) in a.iter().zip(b.iter()) {
                match loose_cmp(x, y)? {
                    Ordering::Equal => {}
                    unequal => return Some(unequal),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Array(_), _) => Some(Ordering::Greater),
        (_, Value::Array(_)) => Some(Ordering::Less),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => Number::Int(*a).compare(Number::Float(*b)),
        (Value::Float(a), Value::Int(b)) => Number::Float(*a).compare(Number::Int(*b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
    }
}
