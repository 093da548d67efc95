//! Compile-time errors.

use php_diagnostic::{Diagnostic, ErrorCode};
use php_ir::Span;

/// Why an expression could not be compiled.
///
/// Compilation stops at the first error; no node is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A construct or operator the core has no lowering for.
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String, span: Span },

    /// Assignment to something that is not a variable or array element.
    #[error("cannot assign to {construct}")]
    InvalidAssignmentTarget { construct: String, span: Span },

    /// `unset(...)` argument that is not a plain variable.
    #[error("unset() argument must be a variable, found {construct}")]
    InvalidUnsetArgument { construct: String, span: Span },

    /// Literal text that does not parse.
    #[error("malformed {kind} literal `{text}`")]
    MalformedLiteral {
        kind: &'static str,
        text: String,
        span: Span,
    },
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnsupportedConstruct { span, .. }
            | Self::InvalidAssignmentTarget { span, .. }
            | Self::InvalidUnsetArgument { span, .. }
            | Self::MalformedLiteral { span, .. } => *span,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedConstruct { .. } => ErrorCode::E1001,
            Self::InvalidAssignmentTarget { .. } => ErrorCode::E1002,
            Self::InvalidUnsetArgument { .. } => ErrorCode::E1003,
            Self::MalformedLiteral { .. } => ErrorCode::E1004,
        }
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self {
            Self::UnsupportedConstruct { .. } => "not supported here",
            Self::InvalidAssignmentTarget { .. } => "not assignable",
            Self::InvalidUnsetArgument { .. } => "expected a variable",
            Self::MalformedLiteral { .. } => "invalid literal",
        };
        Diagnostic::new(self.error_code(), self.to_string()).with_label(self.span(), label)
    }
}
