//! Input syntax tree.
//!
//! The external parser fills an [`ExprArena`]: a flat arena of
//! [`ExprKind`]s indexed by [`ExprId`], with a parallel span array and
//! side tables for argument lists and array elements. `ExprKind` is `Copy`,
//! so the compiler copies a kind out before recursing into its children.

pub mod builder;
pub mod operators;

use std::fmt;

use crate::{Name, Span};
use operators::{AssignOp, IncDecOp, InfixOp, UnaryOpCode};

/// Convert an arena length to a `u32` index.
///
/// # Panics
/// Panics if the arena outgrows `u32` indices.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

/// Convert a list length to a `u16` range length.
///
/// # Panics
/// Panics if a single list has more than `u16::MAX` entries.
#[inline]
pub(crate) fn to_u16(len: usize, what: &str) -> u16 {
    u16::try_from(len).unwrap_or_else(|_| panic!("{what} too long: {len} exceeds u16::MAX"))
}

/// Index into the expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Sentinel for an absent child (no index in `$a[]`, no key in an element).
    pub const INVALID: ExprId = ExprId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
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

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ExprId({})", self.0)
        } else {
            write!(f, "ExprId::INVALID")
        }
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of expression ids in the arena's flattened list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Range of array-literal elements.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ArrayElementRange {
    pub start: u32,
    pub len: u16,
}

impl ArrayElementRange {
    pub const EMPTY: ArrayElementRange = ArrayElementRange { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// One element of an array literal: `value` or `key => value`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArrayElement {
    /// `ExprId::INVALID` when the element has no key.
    pub key: ExprId,
    pub value: ExprId,
}

/// Scalar literal category as classified by the parser.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarKind {
    Int,
    Real,
    /// Strings and bare constants (`true`, `false`, `null`) alike.
    String,
    /// Magic constants, heredocs and other scalars the core does not model.
    Other,
}

/// Name part of a `$variable`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarName {
    /// `$name`
    Ident(Name),
    /// `$$expr` / `${expr}`
    Dynamic(ExprId),
}

/// Callee of a function invocation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Callee {
    /// `name(...)`
    Named(Name),
    /// `$fn(...)` and other computed callees.
    Dynamic(ExprId),
}

/// Array access flavour.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArrayAccessKind {
    /// `$a[index]`
    Indexed,
    /// `$a{index}` (legacy hashtable access)
    Hashtable,
}

/// Expression kinds produced by the parser.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Literal; `text` is the literal exactly as written.
    Scalar { kind: ScalarKind, text: Name },
    Variable(VarName),
    Infix {
        op: InfixOp,
        left: ExprId,
        right: ExprId,
    },
    Unary { op: UnaryOpCode, operand: ExprId },
    /// `++$x` / `--$x`
    Prefix { op: IncDecOp, operand: ExprId },
    /// `$x++` / `$x--`
    Postfix { op: IncDecOp, operand: ExprId },
    Assignment {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    /// `[a, b, c]` / `array(a, b, c)`
    ArrayCreation(ArrayElementRange),
    /// `target[index]`; `index` is `ExprId::INVALID` for `target[]`.
    ArrayAccess {
        target: ExprId,
        index: ExprId,
        kind: ArrayAccessKind,
    },
    Invocation { callee: Callee, args: ExprRange },
    /// `( expr )`
    Parenthesis(ExprId),

    // Constructs outside the expression core.
    /// `cond ? a : b`
    Conditional {
        condition: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    /// `(int) expr`
    Cast { target_type: Name, operand: ExprId },
    /// `expr instanceof Class`
    InstanceOf { operand: ExprId, class: Name },
    /// `function (...) { ... }`
    Closure,
    /// `new Class(...)`
    New { class: Name, args: ExprRange },
    /// Interpolated string `"a $b c"`
    Quote(ExprRange),
    /// Parser error recovery placeholder.
    Error,
}

impl ExprKind {
    /// Human-readable construct name for diagnostics.
    pub const fn construct_name(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Variable(_) => "variable",
            Self::Infix { .. } => "infix expression",
            Self::Unary { .. } => "unary operation",
            Self::Prefix { .. } => "prefix expression",
            Self::Postfix { .. } => "postfix expression",
            Self::Assignment { .. } => "assignment",
            Self::ArrayCreation(_) => "array creation",
            Self::ArrayAccess { .. } => "array access",
            Self::Invocation { .. } => "function invocation",
            Self::Parenthesis(_) => "parenthesis expression",
            Self::Conditional { .. } => "conditional expression",
            Self::Cast { .. } => "cast expression",
            Self::InstanceOf { .. } => "instanceof expression",
            Self::Closure => "closure",
            Self::New { .. } => "class instantiation",
            Self::Quote(_) => "interpolated string",
            Self::Error => "syntax error",
        }
    }
}

/// An expression with its span, as handed to [`ExprArena::alloc`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Arena for parsed expressions.
///
/// Struct-of-arrays layout: `kinds` and `spans` are parallel arrays indexed
/// by [`ExprId`]; `expr_lists` backs [`ExprRange`]s and `elements` backs
/// [`ArrayElementRange`]s.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    spans: Vec<Span>,
    expr_lists: Vec<ExprId>,
    elements: Vec<ArrayElement>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(expr.kind);
        self.spans.push(expr.span);
        id
    }

    /// Allocate a contiguous list of expression ids (arguments, etc.).
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "expression list"))
    }

    /// Allocate the elements of an array literal.
    pub fn alloc_elements(&mut self, elements: &[ArrayElement]) -> ArrayElementRange {
        if elements.is_empty() {
            return ArrayElementRange::EMPTY;
        }
        let start = to_u32(self.elements.len(), "array elements");
        self.elements.extend_from_slice(elements);
        ArrayElementRange {
            start,
            len: to_u16(elements.len(), "array literal"),
        }
    }

    #[inline]
    pub fn expr_kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.spans[id.index()]
    }

    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    pub fn get_elements(&self, range: ArrayElementRange) -> &[ArrayElement] {
        let start = range.start as usize;
        &self.elements[start..start + range.len()]
    }

    pub fn expr_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
