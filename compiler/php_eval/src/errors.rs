//! Runtime errors.
//!
//! `EvalErrorKind` carries the structured category, `EvalError` adds the
//! rendered message and the span of the node that failed. Factory
//! functions (`division_by_zero()`, `undefined_variable(name)`, ...) are the
//! public way to build one; they fill `kind` and `message` together.

use std::fmt;

use php_diagnostic::{Diagnostic, ErrorCode};
use php_ir::{BinaryOp, Span, UnaryOp};

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    NegativeShift {
        amount: i64,
    },

    // Type/Operator
    TypeMismatch {
        expected: String,
        got: String,
    },
    BinaryTypeMismatch {
        op: BinaryOp,
        left: String,
        right: String,
    },
    InvalidUnaryOp {
        op: UnaryOp,
        type_name: String,
    },

    // Access
    UndefinedVariable {
        name: String,
    },
    UndefinedFunction {
        name: String,
    },
    IndexOutOfRange {
        index: i64,
        len: usize,
    },

    /// Errors without a dedicated category (e.g. raised by native functions).
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UndefinedVariable { .. } => ErrorCode::E6001,
            Self::UndefinedFunction { .. } => ErrorCode::E6002,
            Self::DivisionByZero => ErrorCode::E6003,
            Self::TypeMismatch { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::InvalidUnaryOp { .. } => ErrorCode::E6004,
            Self::IndexOutOfRange { .. } => ErrorCode::E6005,
            Self::NegativeShift { .. } => ErrorCode::E6006,
            Self::Custom { .. } => ErrorCode::E6099,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::NegativeShift { amount } => write!(f, "bit shift by negative number {amount}"),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::BinaryTypeMismatch { op, left, right } => write!(
                f,
                "unsupported operand types: {left} {} {right}",
                op.as_symbol()
            ),
            Self::InvalidUnaryOp { op, type_name } => {
                write!(f, "unsupported operand type for unary {}: {type_name}", op.as_symbol())
            }
            Self::UndefinedVariable { name } => write!(f, "undefined variable: ${name}"),
            Self::UndefinedFunction { name } => write!(f, "call to undefined function {name}()"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for array of length {len}")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()` for factory-created errors.
    pub message: String,
    /// Span of the innermost node that failed.
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

impl EvalError {
    /// Create an uncategorized error.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the span unless a more specific one is already present.
    #[must_use]
    pub fn attach_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(self.kind.error_code(), &self.message);
        if let Some(span) = self.span {
            diag = diag.with_label(span, "evaluation failed here");
        }
        for note in &self.notes {
            diag = diag.with_note(note);
        }
        diag
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} at {span}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for EvalError {}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn negative_shift(amount: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NegativeShift { amount })
}

// Type/Operator

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn invalid_unary_op(op: UnaryOp, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op,
        type_name: type_name.to_string(),
    })
}

// Access

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

/// Index read or write outside `0..=len` (reads: `0..len`).
#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { index, len })
}

/// Indexing into something that is not an array.
#[cold]
pub fn cannot_index(type_name: &str) -> EvalError {
    type_mismatch("array", type_name)
}

/// Index value that cannot be used as an integer position.
#[cold]
pub fn invalid_index(type_name: &str) -> EvalError {
    type_mismatch("int", type_name)
}
