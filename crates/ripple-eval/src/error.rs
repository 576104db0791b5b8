//! Runtime error types for the Ripple evaluator.
//!
//! Missing values, sandbox rejections and unknown node kinds are not errors:
//! they evaluate to `undefined` (or `''` for a route read with no route).
//! The only failure that escapes [`evaluate`](crate::evaluate) is an error
//! raised by an application-supplied function.

use ripple_ir::HostError;
use thiserror::Error;

/// Evaluation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// An application function failed; propagated unmodified.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl EvalError {
    /// The underlying host error.
    pub fn host_error(&self) -> &HostError {
        match self {
            EvalError::Host(err) => err,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
