use std::fmt;

use php_ir::Span;

use crate::ErrorCode;

/// Where a diagnostic points, with a short explanation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A reportable error from compilation or evaluation.
///
/// Every diagnostic here is an error; the phase is carried by `code`.
/// `label` is absent when the failure has no source position, e.g. a
/// runtime error raised outside any node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub label: Option<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            label: None,
            notes: Vec::new(),
        }
    }

    /// Point at `span`. A later call replaces the earlier label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.label = Some(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.label.as_ref().map(|label| label.span)
    }
}

/// `error[E6003]: division by zero`, then `at 4..9: ...` and one
/// `note: ...` line per note.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        if let Some(label) = &self.label {
            write!(f, "\n  at {}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}
