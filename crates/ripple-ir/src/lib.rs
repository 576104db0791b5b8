//! Shared types for the Ripple evaluator.
//!
//! This crate defines the compiled expression IR, the host value model,
//! style presets and the error types used across the evaluator crates.
//! It contains no evaluation logic.

mod error;
pub mod ast;
pub mod number;
pub mod style;
pub mod time;
pub mod value;

pub use ast::{BinOp, Expr, RouteSource};
pub use error::{HostError, IrError};
pub use style::{CompoundVariant, StylePreset};
pub use value::{Builtin, ElementInfo, ElementRef, Function, NativeFn, Object, Value};

/// Result type for IR decoding.
pub type Result<T> = std::result::Result<T, IrError>;
