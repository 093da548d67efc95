//! PHP Eval - evaluator for compiled expression nodes.
//!
//! # Architecture
//!
//! - `Value`: tagged runtime values with copy-on-write arrays
//! - `Frame`: slot-indexed variable storage for one in-flight evaluation
//! - `evaluate_binary` / `evaluate_unary`: direct enum dispatch on operator kinds
//! - `FunctionRegistry`: the seam to the external function-call machinery
//! - `Interpreter`: walks a `CompiledExpr` against a `Frame`
//!
//! Nodes are never mutated during evaluation; only the `Frame` passed in
//! is. Any number of frames may be evaluated against the same compiled
//! expression concurrently.

pub mod errors;
mod frame;
pub mod interpreter;
mod operators;
mod policy;
mod registry;
mod unary_operators;
mod value;

use std::sync::Once;

pub use errors::{
    binary_type_mismatch, cannot_index, division_by_zero, index_out_of_range, invalid_index,
    invalid_unary_op, negative_shift, type_mismatch, undefined_function, undefined_variable,
    EvalError, EvalErrorKind, EvalResult,
};
pub use frame::Frame;
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use operators::evaluate_binary;
pub use policy::UndefinedVariablePolicy;
pub use registry::{CallTarget, FunctionRegistry, FunctionTable, NativeFn, NoFunctions};
pub use unary_operators::{evaluate_unary, increment};
pub use value::{Heap, Number, Value};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call repeatedly; only
/// the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host application may already own the global subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(test)]
mod tests;
