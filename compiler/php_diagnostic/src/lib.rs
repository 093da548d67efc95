//! Diagnostic values for compile-time and runtime errors.
//!
//! The compiler and evaluator never log-and-continue: they return errors,
//! and every error converts into a [`Diagnostic`] carrying an
//! [`ErrorCode`], a message and the offending span. The caller decides
//! whether to print, abort or aggregate.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
