//! PHP IR - shared data types for the expression core.
//!
//! This crate contains the data structures passed between the front end,
//! the compiler and the evaluator:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Slots and scope ids for frame storage
//! - The input syntax tree (`ExprArena`) filled by the external parser
//! - The executable node tree (`NodeArena`) produced by `php_lower`
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and literal text are `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId`/`NodeId` indices
//! - **Resolve Early**: variables are `Slot` indices by the time a node exists
//!
//! Node kinds that contain floats store them as u64 bits so they stay `Eq + Hash`.

mod interner;
mod name;
mod slot;
mod span;

pub mod ast;
pub mod node;

pub use ast::builder::AstBuilder;
pub use ast::operators::{AssignOp, IncDecOp, InfixOp, UnaryOpCode};
pub use ast::{
    ArrayAccessKind, ArrayElement, ArrayElementRange, Callee, Expr, ExprArena, ExprId, ExprKind,
    ExprRange, ScalarKind, VarName,
};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use node::{
    BinaryOp, CompiledExpr, Fixity, Node, NodeArena, NodeId, NodeRange, SharedNodes, SlotRange,
    UnaryOp,
};
pub use slot::{ScopeId, Slot};
pub use span::{Span, SpanError};
