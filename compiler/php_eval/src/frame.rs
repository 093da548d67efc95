//! Per-evaluation variable storage.

use php_ir::Slot;

use crate::Value;

/// Lifecycle of one slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum CellState {
    /// Never written in this frame; reads see `null`.
    #[default]
    Vacant,
    /// Cleared by `unset`; reads are undefined-variable errors.
    Unset,
    Set,
}

/// One slot. `value` is `null` unless `state` is `Set`.
#[derive(Clone, Debug, Default, PartialEq)]
struct Cell {
    state: CellState,
    value: Value,
}

/// Slot-indexed variable storage for one in-flight evaluation.
///
/// Sized from `Scope::slot_count()` at call entry; grows on demand when a
/// write lands past the end. Never shared between concurrent evaluations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame with `count` vacant slots.
    pub fn with_slots(count: usize) -> Self {
        Frame {
            cells: vec![Cell::default(); count],
        }
    }

    /// Read a slot.
    ///
    /// Vacant slots read as `Some(Value::Null)`; `None` means the slot was
    /// unset and the read must be treated as undefined.
    pub fn get(&self, slot: Slot) -> Option<Value> {
        match self.cells.get(slot.index()) {
            None => Some(Value::Null),
            Some(cell) if cell.state == CellState::Unset => None,
            Some(cell) => Some(cell.value.clone()),
        }
    }

    /// Store a value, growing the frame if needed.
    pub fn set(&mut self, slot: Slot, value: Value) {
        *self.cell_mut(slot) = Cell {
            state: CellState::Set,
            value,
        };
    }

    /// Mark a slot as unset.
    pub fn unset(&mut self, slot: Slot) {
        *self.cell_mut(slot) = Cell {
            state: CellState::Unset,
            value: Value::Null,
        };
    }

    /// Mutable access to a slot's value, defining it as `null` first if it
    /// is vacant or unset.
    pub(crate) fn entry(&mut self, slot: Slot) -> &mut Value {
        let cell = self.cell_mut(slot);
        cell.state = CellState::Set;
        &mut cell.value
    }

    /// Number of slots currently allocated.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn cell_mut(&mut self, slot: Slot) -> &mut Cell {
        let index = slot.index();
        if index >= self.cells.len() {
            self.cells.resize_with(index + 1, Cell::default);
        }
        &mut self.cells[index]
    }
}
