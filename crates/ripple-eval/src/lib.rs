//! Ripple expression evaluator.
//!
//! Evaluates compiled template expressions (see [`ripple_ir::Expr`]) against a
//! per-frame [`EvalContext`]. The same evaluator runs during server rendering
//! and in the browser runtime; the two differ only in the [`Environment`]
//! they supply.
//!
//! Evaluation is sandboxed: prototype-style keys are never read, built-in
//! receivers only accept allowlisted methods, and the global surface is
//! fixed. Rejections evaluate to `undefined` rather than failing.
//!
//! ```
//! use std::collections::HashMap;
//! use ripple_eval::{evaluate, EvalContext, ServerEnvironment};
//! use ripple_eval::ripple_ir::{BinOp, Expr, Value};
//!
//! let mut state = HashMap::new();
//! state.insert("count".to_string(), Value::from(2));
//! let env = ServerEnvironment::default();
//! let ctx = EvalContext::new(&state, &env);
//!
//! let expr = Expr::bin(BinOp::Mul, Expr::state("count"), Expr::lit(21));
//! assert_eq!(evaluate(&expr, &ctx).unwrap(), Value::from(42));
//! ```

mod access;
mod client;
mod context;
mod env;
mod error;
mod evaluator;
mod methods;
mod operators;
pub mod policy;
mod registry;
mod server;
mod style;

pub use client::{ClientEnvironment, ValidityState};
pub use context::{EvalContext, Imports, Locals, RouteContext, StateReader, StyleTable};
pub use env::{Environment, GlobalScope};
pub use error::{EvalError, EvalResult};
pub use evaluator::evaluate;
pub use registry::{FunctionRegistry, FunctionRegistryBuilder};
pub use server::ServerEnvironment;
pub use style::evaluate_style;

pub use ripple_ir;
