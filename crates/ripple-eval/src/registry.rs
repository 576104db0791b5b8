//! Plugin function registry.
//!
//! Registers the application functions reachable from expressions: as
//! globals through `var`, and by name through `call` with a `null` target.
//! A registry is frozen once built and shared by reference count.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use ripple_ir::{Function, HostError, Value};

/// Registry mapping function name → callable.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: Arc<IndexMap<String, Function>>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::default()
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Collects functions before freezing them into a [`FunctionRegistry`].
#[derive(Default)]
pub struct FunctionRegistryBuilder {
    functions: IndexMap<String, Function>,
}

impl FunctionRegistryBuilder {
    /// Register `function` under its own name. A later registration of the
    /// same name replaces the earlier one.
    pub fn register(mut self, function: Function) -> Self {
        self.functions.insert(function.name().to_string(), function);
        self
    }

    /// Register a receiver-less closure under `name`.
    pub fn register_fn(
        self,
        name: &str,
        body: impl Fn(&[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    ) -> Self {
        self.register(Function::from_fn(name, body))
    }

    pub fn build(self) -> FunctionRegistry {
        FunctionRegistry {
            functions: Arc::new(self.functions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_registration_wins() {
        let registry = FunctionRegistry::builder()
            .register_fn("greet", |_| Ok(Value::from("hello")))
            .register_fn("greet", |_| Ok(Value::from("hi")))
            .build();
        assert_eq!(registry.len(), 1);
        let greet = registry.get("greet").unwrap();
        assert_eq!(greet.call(&[]).unwrap(), Value::from("hi"));
    }

    #[test]
    fn names_in_registration_order() {
        let registry = FunctionRegistry::builder()
            .register_fn("b", |_| Ok(Value::Null))
            .register_fn("a", |_| Ok(Value::Null))
            .build();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["b", "a"]);
        assert!(registry.contains("a"));
        assert!(!FunctionRegistry::new().contains("a"));
    }
}
