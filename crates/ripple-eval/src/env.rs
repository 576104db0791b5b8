//! Environment adapter: the host capabilities the evaluator may ask for.
//!
//! Everything that differs between server rendering and the browser runtime
//! sits behind [`Environment`]. The evaluator's dispatch is identical in both.

use ripple_ir::{Builtin, Function, HostError, Value};

use crate::policy;
use crate::registry::FunctionRegistry;

/// Host capability interface.
pub trait Environment: Send + Sync {
    /// Resolve a `ref` name to a host element handle, `null` if none.
    fn resolve_ref(&self, name: &str) -> Value;

    /// Read a form-control validity flag (`valid` when `property` is omitted).
    fn resolve_validity(&self, ref_name: &str, property: Option<&str>) -> bool;

    /// Resolve a global symbol, `undefined` if it is not part of the safe surface.
    fn resolve_global(&self, name: &str) -> Value;

    /// Attach `parent` as the receiver of a function reached by property
    /// traversal. Identity by default.
    fn bind_function(&self, function: Function, _parent: &Value) -> Function {
        function
    }

    /// Invoke an application function. Direct invocation by default.
    fn call_function(
        &self,
        function: &Function,
        this: &Value,
        args: &[Value],
    ) -> Result<Value, HostError> {
        function.call_with(this, args)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// GlobalScope
// ══════════════════════════════════════════════════════════════════════════════

/// The fixed safe global surface: built-ins plus registered plugin functions.
#[derive(Debug, Clone, Default)]
pub struct GlobalScope {
    functions: FunctionRegistry,
}

impl GlobalScope {
    pub fn new(functions: FunctionRegistry) -> Self {
        Self { functions }
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Resolve `name`; anything outside the surface is `undefined`.
    pub fn resolve(&self, name: &str) -> Value {
        if policy::is_forbidden_key(name) {
            return Value::Undefined;
        }
        match name {
            "Math" => Value::Builtin(Builtin::Math),
            "Date" => Value::Builtin(Builtin::Date),
            "Infinity" => Value::Number(f64::INFINITY),
            "NaN" => Value::Number(f64::NAN),
            "undefined" => Value::Undefined,
            _ => self
                .functions
                .get(name)
                .cloned()
                .map_or(Value::Undefined, Value::Function),
        }
    }
}
