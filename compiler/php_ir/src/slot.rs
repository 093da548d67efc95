//! Frame slots and scope identifiers.

use std::fmt;

/// Index of one variable's storage location within a `Frame`.
///
/// Assigned by `Scope` in first-definition order and baked into the node
/// tree; the evaluator never looks variables up by name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Slot(u32);

impl Slot {
    /// Sentinel for a read of a name that was never bound when compiled.
    pub const INVALID: Slot = Slot(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Slot(index)
    }

    /// Index into the frame's storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Slot({})", self.0)
        } else {
            write!(f, "Slot::INVALID")
        }
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Identifies the function/top-level body a node was compiled in.
///
/// Handed to the function registry at invocation time so lookups can be
/// scoped (e.g. functions declared inside a body).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The top-level (script) body.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        ScopeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
