//! PHP Lower - compiles parsed expressions into executable nodes.
//!
//! A single recursive pass over the [`ExprArena`](php_ir::ExprArena):
//! - variables are resolved to frame slots through a [`Scope`]
//! - surface operators are mapped to `BinaryOp`/`UnaryOp` by the
//!   [`operator_table`]
//! - compound assignment, array writes and `unset(...)` are desugared
//! - literal text is parsed into typed constants
//!
//! Constructs without a lowering fail with a [`CompileError`]; nothing
//! partially built is ever returned.

mod error;
pub mod literal;
mod lower;
pub mod operator_table;
mod scope;

pub use error::CompileError;
pub use lower::{compile, compile_sequence};
pub use scope::Scope;
