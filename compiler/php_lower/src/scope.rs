//! Compile-time variable binding.

use rustc_hash::FxHashMap;

use php_ir::{Name, ScopeId, Slot};

/// Name-to-slot table for one function or top-level body.
///
/// Slots are handed out densely in first-definition order and never
/// reused, so a frame sized to [`Scope::slot_count`] holds every variable
/// of the body. The scope is not thread-safe; resolve a body on one thread.
#[derive(Clone, Debug)]
pub struct Scope {
    id: ScopeId,
    slots: FxHashMap<Name, Slot>,
    /// Slot index -> name.
    names: Vec<Name>,
}

impl Scope {
    pub fn new(id: ScopeId) -> Self {
        Scope {
            id,
            slots: FxHashMap::default(),
            names: Vec::new(),
        }
    }

    /// Scope of the top-level script body.
    pub fn root() -> Self {
        Self::new(ScopeId::ROOT)
    }

    #[inline]
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Slot for `name`, allocating the next one on first sight.
    ///
    /// Used for write targets.
    pub fn resolve_or_define(&mut self, name: Name) -> Slot {
        if let Some(&slot) = self.slots.get(&name) {
            return slot;
        }
        let index = u32::try_from(self.names.len())
            .unwrap_or_else(|_| panic!("too many variables in one scope: {}", self.names.len()));
        let slot = Slot::new(index);
        self.slots.insert(name, slot);
        self.names.push(name);
        tracing::trace!(slot = index, "defined variable slot");
        slot
    }

    /// Slot for `name` if it has been defined. Used for plain reads.
    pub fn resolve_existing(&self, name: Name) -> Option<Slot> {
        self.slots.get(&name).copied()
    }

    /// Number of slots defined so far.
    pub fn slot_count(&self) -> usize {
        self.names.len()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}
