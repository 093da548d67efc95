//! Runtime values.
//!
//! Scalars are stored inline. Arrays live behind [`Heap`], so cloning a
//! `Value` is O(1) and a write through one clone never shows up in another.
//! That is the whole copy-on-assign story: every assignment stores a clone,
//! and every in-place mutation goes through [`Heap::make_mut`].

mod heap;

use std::cmp::Ordering;
use std::fmt;

pub use heap::Heap;

/// A runtime value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Ordered, zero-indexed list of values.
    Array(Heap<Vec<Value>>),
}

/// A value after numeric coercion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => int_to_float(n),
            Number::Float(f) => f,
        }
    }

    /// Truncate toward zero (saturating for out-of-range floats).
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Int(n) => n,
            Number::Float(f) => float_to_int(f),
        }
    }

    /// Numeric ordering; `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Int(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

#[allow(clippy::cast_precision_loss, reason = "int to float promotion is lossy by definition")]
#[inline]
pub(crate) fn int_to_float(n: i64) -> f64 {
    n as f64
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "float to int truncates toward zero and saturates"
)]
#[inline]
pub(crate) fn float_to_int(f: f64) -> i64 {
    f as i64
}

impl Value {
    /// Create an array value.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    /// Create an empty array value.
    pub fn empty_array() -> Self {
        Value::array(Vec::new())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Array(_) => "array",
        }
    }

    /// Truthiness: `null`, `false`, `0`, `0.0` and `[]` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Array(items) => !items.is_empty(),
        }
    }

    /// A value stored by an assignment.
    ///
    /// Scalars copy by value. Arrays share storage until either side is
    /// written, which is observably the same as a deep copy.
    #[inline]
    #[must_use]
    pub fn copy(&self) -> Value {
        self.clone()
    }

    /// Numeric view: `null` is 0, booleans are 0/1, arrays have none.
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Value::Null => Some(Number::Int(0)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Array(_) => None,
        }
    }

    /// Array index view: integers, truncated floats and booleans.
    pub fn to_index(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) => Some(float_to_int(*f)),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Null | Value::Array(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
