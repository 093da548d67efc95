use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Compilation (syntax tree to nodes)
/// - E6xxx: Evaluation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Compile Errors (E1xxx)
    /// Construct or operator with no compiler support
    E1001,
    /// Assignment to something that is not a variable or array element
    E1002,
    /// `unset` argument is not a plain variable
    E1003,
    /// Literal text that does not parse as a number
    E1004,

    // Runtime Errors (E6xxx)
    /// Undefined variable
    E6001,
    /// Undefined function
    E6002,
    /// Division by zero
    E6003,
    /// Type mismatch
    E6004,
    /// Index out of range
    E6005,
    /// Bit shift by negative number
    E6006,
    /// Uncategorized runtime error
    E6099,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6099 => "E6099",
        }
    }

    /// Whether this code belongs to the compilation phase.
    pub fn is_compile_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Whether this code belongs to the evaluation phase.
    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
