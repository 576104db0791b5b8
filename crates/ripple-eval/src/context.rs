//! Evaluation context: the read-only bundle every evaluation runs against.
//!
//! A context is built fresh per render frame or action step and dropped
//! afterwards. Nothing in it is written by the evaluator; nested scopes
//! (lambda parameters) are new [`Locals`] layered over the outer ones.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;
use ripple_ir::{StylePreset, Value};
use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::registry::FunctionRegistry;

/// Imported values by name (`import` / `data` nodes).
pub type Imports = IndexMap<String, Value>;

/// Style presets by name (`style` nodes).
pub type StyleTable = IndexMap<String, StylePreset>;

// ══════════════════════════════════════════════════════════════════════════════
// StateReader
// ══════════════════════════════════════════════════════════════════════════════

/// Read-only named-value lookup over the reactive store.
pub trait StateReader: Send + Sync {
    /// Current value of `name`, `undefined` if the store has no such entry.
    fn get(&self, name: &str) -> Value;
}

impl StateReader for HashMap<String, Value> {
    fn get(&self, name: &str) -> Value {
        HashMap::get(self, name).cloned().unwrap_or_default()
    }
}

impl StateReader for BTreeMap<String, Value> {
    fn get(&self, name: &str) -> Value {
        BTreeMap::get(self, name).cloned().unwrap_or_default()
    }
}

impl StateReader for IndexMap<String, Value> {
    fn get(&self, name: &str) -> Value {
        IndexMap::get(self, name).cloned().unwrap_or_default()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Locals
// ══════════════════════════════════════════════════════════════════════════════

/// A single scope level.
#[derive(Debug)]
struct Frame {
    bindings: IndexMap<String, Value>,
    parent: Option<Arc<Frame>>,
}

/// Lexical scope: lambda parameters and loop variables.
///
/// Scopes are persistent. [`Locals::extend`] returns a new scope layered over
/// this one and leaves this one untouched, so sibling lambda invocations never
/// observe each other's bindings. Cloning is a reference-count bump.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    frame: Option<Arc<Frame>>,
}

impl Locals {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut frame = self.frame.as_deref();
        while let Some(current) = frame {
            if let Some(v) = current.bindings.get(name) {
                return Some(v);
            }
            frame = current.parent.as_deref();
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// A new scope with `bindings` layered over this one.
    pub fn extend<I, K>(&self, bindings: I) -> Locals
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let bindings: IndexMap<String, Value> =
            bindings.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if bindings.is_empty() {
            return self.clone();
        }
        Locals {
            frame: Some(Arc::new(Frame {
                bindings,
                parent: self.frame.clone(),
            })),
        }
    }

    /// A new scope binding a single name over this one.
    pub fn with(&self, name: impl Into<String>, value: Value) -> Locals {
        self.extend([(name.into(), value)])
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Locals {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Locals::new().extend(iter)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// RouteContext
// ══════════════════════════════════════════════════════════════════════════════

/// The current route, as seen by `route` nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteContext {
    #[serde(default)]
    pub params: IndexMap<String, String>,
    #[serde(default)]
    pub query: IndexMap<String, String>,
    #[serde(default)]
    pub path: String,
}

impl RouteContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// EvalContext
// ══════════════════════════════════════════════════════════════════════════════

/// Everything one evaluation may read.
#[derive(Clone)]
pub struct EvalContext<'a> {
    pub state: &'a dyn StateReader,
    pub locals: Locals,
    pub env: &'a dyn Environment,
    pub route: Option<&'a RouteContext>,
    pub imports: Option<&'a Imports>,
    pub styles: Option<&'a StyleTable>,
    /// Plugin functions reachable through `call` with a `null` target.
    pub functions: Option<&'a FunctionRegistry>,
}

impl<'a> EvalContext<'a> {
    /// A context with empty locals and no route, imports, styles or functions.
    pub fn new(state: &'a dyn StateReader, env: &'a dyn Environment) -> Self {
        Self {
            state,
            locals: Locals::new(),
            env,
            route: None,
            imports: None,
            styles: None,
            functions: None,
        }
    }

    pub fn with_locals(mut self, locals: Locals) -> Self {
        self.locals = locals;
        self
    }

    pub fn with_route(mut self, route: &'a RouteContext) -> Self {
        self.route = Some(route);
        self
    }

    pub fn with_imports(mut self, imports: &'a Imports) -> Self {
        self.imports = Some(imports);
        self
    }

    pub fn with_styles(mut self, styles: &'a StyleTable) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_functions(mut self, functions: &'a FunctionRegistry) -> Self {
        self.functions = Some(functions);
        self
    }

    /// The same context over a different lexical scope.
    pub fn scoped(&self, locals: Locals) -> EvalContext<'a> {
        EvalContext { locals, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scope_shadows_outer() {
        let outer: Locals = [("x", Value::from(1)), ("y", Value::from(2))]
            .into_iter()
            .collect();
        let inner = outer.with("x", Value::from(10));
        assert_eq!(inner.get("x"), Some(&Value::from(10)));
        assert_eq!(inner.get("y"), Some(&Value::from(2)));
        assert_eq!(outer.get("x"), Some(&Value::from(1)));
    }

    #[test]
    fn sibling_scopes_do_not_leak() {
        let outer = Locals::new();
        let a = outer.with("item", Value::from("a"));
        let b = outer.with("item", Value::from("b"));
        assert_eq!(a.get("item"), Some(&Value::from("a")));
        assert_eq!(b.get("item"), Some(&Value::from("b")));
        assert!(!outer.contains("item"));
    }

    #[test]
    fn state_reader_over_maps() {
        let mut state = HashMap::new();
        state.insert("count".to_string(), Value::from(3));
        assert_eq!(StateReader::get(&state, "count"), Value::from(3));
        assert_eq!(StateReader::get(&state, "missing"), Value::Undefined);
    }
}
