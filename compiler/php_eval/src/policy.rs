//! Evaluation policies.

/// What a read of an undefined variable does.
///
/// "Undefined" covers names never bound in scope when the read was
/// compiled and slots cleared by `unset`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UndefinedVariablePolicy {
    /// Fail with an undefined-variable error.
    #[default]
    Error,
    /// Log a warning and read `null`.
    WarnAndNull,
}

impl UndefinedVariablePolicy {
    #[inline]
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Error)
    }
}
