//! Error types shared across the Ripple crates.

use thiserror::Error;

/// Failure to decode compiled IR (expression nodes, style presets) from JSON.
#[derive(Debug, Error)]
pub enum IrError {
    /// The document is not valid JSON or a known node is missing a field.
    #[error("malformed expression IR: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error raised by an application-supplied function.
///
/// The evaluator never produces one of these itself; it only passes them
/// through unchanged from the function that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{message}", .function.as_deref().map(|f| format!("{f}: ")).unwrap_or_default())]
pub struct HostError {
    /// Name of the failing function, when the function itself supplies one.
    pub function: Option<String>,
    /// Human-readable failure message.
    pub message: String,
}

impl HostError {
    /// Create an error with no function attribution.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            function: None,
            message: message.into(),
        }
    }

    /// Attribute the error to `function`.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_function_name() {
        let err = HostError::new("boom").with_function("fetchUser");
        assert_eq!(err.to_string(), "fetchUser: boom");
        assert_eq!(HostError::new("plain").to_string(), "plain");
    }
}
