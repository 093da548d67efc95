//! Executable node tree.
//!
//! [`NodeArena`] holds every node of one compiled expression, struct-of-arrays
//! style (`kinds` and `spans` parallel, indexed by [`NodeId`]). Children are
//! ids into the same arena, so a tree never owns its children and can never
//! form a cycle. Nodes are immutable once the compiler hands the arena out
//! inside a [`CompiledExpr`]; evaluation only mutates the frame it is given.

mod ops;

use std::fmt;
use std::sync::Arc;

use crate::ast::{to_u16, to_u32};
use crate::{Name, ScopeId, Slot, Span};

pub use ops::{BinaryOp, Fixity, UnaryOp};

/// Index into a [`NodeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of node ids in the arena's flattened list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct NodeRange {
    pub start: u32,
    pub len: u16,
}

impl NodeRange {
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Range of slots in the arena's slot-list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SlotRange {
    pub start: u32,
    pub len: u16,
}

impl SlotRange {
    pub const EMPTY: SlotRange = SlotRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Executable node kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Node {
    // Literals
    Int(i64),
    /// Float stored as bits (`f64::to_bits`).
    Float(u64),
    Bool(bool),

    // Variables
    /// Variable read. `slot` is `Slot::INVALID` when the name was unbound
    /// at compile time; evaluation then fails with an undefined-variable error.
    Var { name: Name, slot: Slot },
    /// `$x = value`; yields the stored copy.
    Assign { slot: Slot, value: NodeId },
    /// `++$x`, `$x++`, `--$x`, `$x--`.
    IncDec {
        slot: Slot,
        delta: i64,
        fixity: Fixity,
    },

    // Operators
    Unary { op: UnaryOp, operand: NodeId },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },

    // Arrays
    /// Array literal; elements evaluated left to right.
    List(NodeRange),
    /// `target[index]` read.
    Index { target: NodeId, index: NodeId },
    /// `target[index] = value`. `target` is a `Var` or `Index` node;
    /// `index` is `NodeId::INVALID` for an append (`target[] = value`).
    IndexAssign {
        target: NodeId,
        index: NodeId,
        value: NodeId,
    },

    // Calls and statements-as-expressions
    /// Function call, resolved through the registry on every evaluation.
    Call {
        func: Name,
        scope: ScopeId,
        args: NodeRange,
    },
    /// `unset($a, $b)`
    Unset(SlotRange),
    /// Evaluate each node in order, yielding the last (Null when empty).
    Seq(NodeRange),
}

/// Arena for executable nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    kinds: Vec<Node>,
    spans: Vec<Span>,
    node_lists: Vec<NodeId>,
    slot_lists: Vec<Slot>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for roughly `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        NodeArena {
            kinds: Vec::with_capacity(nodes),
            spans: Vec::with_capacity(nodes),
            node_lists: Vec::new(),
            slot_lists: Vec::new(),
        }
    }

    /// Allocate a node, returning its id.
    pub fn push(&mut self, kind: Node, span: Span) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "nodes"));
        self.kinds.push(kind);
        self.spans.push(span);
        id
    }

    /// Allocate a contiguous list of node ids (elements, arguments, sequences).
    pub fn push_node_list(&mut self, ids: &[NodeId]) -> NodeRange {
        if ids.is_empty() {
            return NodeRange::EMPTY;
        }
        let start = to_u32(self.node_lists.len(), "node lists");
        self.node_lists.extend_from_slice(ids);
        NodeRange {
            start,
            len: to_u16(ids.len(), "node list"),
        }
    }

    /// Allocate a contiguous list of slots.
    pub fn push_slot_list(&mut self, slots: &[Slot]) -> SlotRange {
        if slots.is_empty() {
            return SlotRange::EMPTY;
        }
        let start = to_u32(self.slot_lists.len(), "slot lists");
        self.slot_lists.extend_from_slice(slots);
        SlotRange {
            start,
            len: to_u16(slots.len(), "slot list"),
        }
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &Node {
        &self.kinds[id.index()]
    }

    /// Source span of a node (`Span::DUMMY` for synthesized nodes).
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    pub fn get_node_list(&self, range: NodeRange) -> &[NodeId] {
        let start = range.start as usize;
        &self.node_lists[start..start + range.len()]
    }

    pub fn get_slots(&self, range: SlotRange) -> &[Slot] {
        let start = range.start as usize;
        &self.slot_lists[start..start + range.len()]
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Reference-counted, immutable node arena.
#[derive(Clone, Debug)]
pub struct SharedNodes(Arc<NodeArena>);

impl SharedNodes {
    pub fn new(arena: NodeArena) -> Self {
        SharedNodes(Arc::new(arena))
    }
}

impl std::ops::Deref for SharedNodes {
    type Target = NodeArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Output of compiling one expression: its nodes and the root.
///
/// Cheap to clone and `Send + Sync`; any number of frames may be evaluated
/// against one `CompiledExpr` concurrently.
#[derive(Clone, Debug)]
pub struct CompiledExpr {
    nodes: SharedNodes,
    root: NodeId,
}

impl CompiledExpr {
    pub fn new(nodes: NodeArena, root: NodeId) -> Self {
        CompiledExpr {
            nodes: SharedNodes::new(nodes),
            root,
        }
    }

    #[inline]
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Kind of the root node.
    pub fn root_kind(&self) -> &Node {
        self.nodes.kind(self.root)
    }

    /// Span of the root node.
    pub fn span(&self) -> Span {
        self.nodes.span(self.root)
    }
}
