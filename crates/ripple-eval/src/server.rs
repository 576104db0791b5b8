//! Server-side rendering host.
//!
//! There is no DOM on the server: refs resolve to `null` and every form
//! control is treated as pristine and valid.

use ripple_ir::{Function, Value};
use tracing::trace;

use crate::env::{Environment, GlobalScope};
use crate::registry::FunctionRegistry;

/// [`Environment`] used while rendering HTML on the server.
#[derive(Debug, Clone, Default)]
pub struct ServerEnvironment {
    globals: GlobalScope,
}

impl ServerEnvironment {
    pub fn new(globals: GlobalScope) -> Self {
        Self { globals }
    }

    /// A server host exposing `functions` as plugin globals.
    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self::new(GlobalScope::new(functions))
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }
}

impl Environment for ServerEnvironment {
    fn resolve_ref(&self, name: &str) -> Value {
        trace!(name, "ref requested during server render");
        Value::Null
    }

    fn resolve_validity(&self, _ref_name: &str, property: Option<&str>) -> bool {
        property.unwrap_or("valid") == "valid"
    }

    fn resolve_global(&self, name: &str) -> Value {
        self.globals.resolve(name)
    }

    fn bind_function(&self, function: Function, parent: &Value) -> Function {
        function.bind(parent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refs_are_null_on_the_server() {
        let env = ServerEnvironment::default();
        assert_eq!(env.resolve_ref("emailInput"), Value::Null);
    }

    #[test]
    fn controls_are_pristine() {
        let env = ServerEnvironment::default();
        assert!(env.resolve_validity("email", None));
        assert!(env.resolve_validity("email", Some("valid")));
        assert!(!env.resolve_validity("email", Some("valueMissing")));
    }
}
