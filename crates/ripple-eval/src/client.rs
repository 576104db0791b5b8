//! Browser runtime host.
//!
//! Holds the table of mounted elements that `ref` and `validity` nodes can
//! see. The table is maintained by the DOM layer between frames; evaluation
//! only reads it.

use std::collections::HashMap;

use ripple_ir::{ElementRef, Function, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::{Environment, GlobalScope};
use crate::registry::FunctionRegistry;

/// Constraint-validation flags of a form control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidityState {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl ValidityState {
    /// No constraint is violated.
    pub fn valid(&self) -> bool {
        !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow
            || self.step_mismatch
            || self.bad_input
            || self.custom_error)
    }

    /// Read a flag by its DOM property name.
    pub fn flag(&self, property: &str) -> Option<bool> {
        let flag = match property {
            "valid" => self.valid(),
            "valueMissing" => self.value_missing,
            "typeMismatch" => self.type_mismatch,
            "patternMismatch" => self.pattern_mismatch,
            "tooLong" => self.too_long,
            "tooShort" => self.too_short,
            "rangeUnderflow" => self.range_underflow,
            "rangeOverflow" => self.range_overflow,
            "stepMismatch" => self.step_mismatch,
            "badInput" => self.bad_input,
            "customError" => self.custom_error,
            _ => return None,
        };
        Some(flag)
    }
}

#[derive(Debug, Clone)]
struct MountedElement {
    handle: ElementRef,
    validity: ValidityState,
}

/// [`Environment`] used by the browser runtime.
#[derive(Debug, Clone, Default)]
pub struct ClientEnvironment {
    globals: GlobalScope,
    elements: HashMap<String, MountedElement>,
}

impl ClientEnvironment {
    pub fn new(globals: GlobalScope) -> Self {
        Self {
            globals,
            elements: HashMap::new(),
        }
    }

    /// A client host exposing `functions` as plugin globals.
    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self::new(GlobalScope::new(functions))
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    /// Register a mounted element under its `ref` name, replacing any
    /// element previously registered under that name.
    pub fn mount(&mut self, name: &str, tag: &str) -> ElementRef {
        let handle = ElementRef::new(name, tag);
        self.elements.insert(
            name.to_string(),
            MountedElement {
                handle: handle.clone(),
                validity: ValidityState::default(),
            },
        );
        handle
    }

    /// Forget a mounted element.
    pub fn unmount(&mut self, name: &str) {
        self.elements.remove(name);
    }

    /// Record the current validity of a mounted control. Returns `false`
    /// if no element is mounted under `name`.
    pub fn set_validity(&mut self, name: &str, validity: ValidityState) -> bool {
        match self.elements.get_mut(name) {
            Some(element) => {
                element.validity = validity;
                true
            }
            None => false,
        }
    }
}

impl Environment for ClientEnvironment {
    fn resolve_ref(&self, name: &str) -> Value {
        self.elements
            .get(name)
            .map_or(Value::Null, |element| Value::Ref(element.handle.clone()))
    }

    fn resolve_validity(&self, ref_name: &str, property: Option<&str>) -> bool {
        let Some(element) = self.elements.get(ref_name) else {
            debug!(ref_name, "validity requested for unmounted ref");
            return false;
        };
        element
            .validity
            .flag(property.unwrap_or("valid"))
            .unwrap_or(false)
    }

    fn resolve_global(&self, name: &str) -> Value {
        self.globals.resolve(name)
    }

    fn bind_function(&self, function: Function, parent: &Value) -> Function {
        function.bind(parent.clone())
    }
}
