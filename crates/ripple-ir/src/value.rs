//! Host value model.
//!
//! [`Value`] is the set of values the UI runtime's host language can produce.
//! Composite values are reference-counted so that strict equality on arrays,
//! objects, functions and element refs is identity, exactly as in the host.
//! Rust's `PartialEq` on [`Value`] is structural instead; it exists for tests
//! and parity comparisons and is never used for the `==` operator.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HostError;
use crate::number::{format_number, parse_number};
use crate::time;

/// Insertion-ordered string-keyed mapping (the host's plain object).
pub type Object = IndexMap<String, Value>;

// ══════════════════════════════════════════════════════════════════════════════
// Value
// ══════════════════════════════════════════════════════════════════════════════

/// A runtime value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Arc<Vec<Value>>),
    Object(Arc<Object>),
    Function(Function),
    /// Epoch milliseconds; `NaN` is an invalid date.
    Date(f64),
    Builtin(Builtin),
    Ref(ElementRef),
}

/// Built-in global namespaces reachable from expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// The `Math` namespace.
    Math,
    /// The `Date` constructor.
    Date,
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    pub fn object(entries: Object) -> Self {
        Value::Object(Arc::new(entries))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Host truthiness: `undefined`, `null`, `false`, `±0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// The host's `typeof`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) | Value::Builtin(Builtin::Date) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::Date(_)
            | Value::Builtin(Builtin::Math)
            | Value::Ref(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Whether this value is a primitive (not an object in host terms).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    // ── Coercions ────────────────────────────────────────────────────────

    /// The host's `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Date(ms) => *ms,
            Value::Array(_) | Value::Object(_) => parse_number(&self.to_string()),
            Value::Function(_) | Value::Builtin(_) | Value::Ref(_) => f64::NAN,
        }
    }

    /// The host's `ToString`; identical to this value's [`Display`](fmt::Display).
    pub fn to_js_string(&self) -> String {
        self.to_string()
    }

    /// Strict equality (`===`): same kind and value, identity for composites.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            // Dates carry no identity of their own; equal instants compare equal.
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }

    /// `SameValueZero`: strict equality except that `NaN` equals `NaN`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    // ── JSON ─────────────────────────────────────────────────────────────

    /// Convert to JSON with `JSON.stringify` conventions.
    ///
    /// `undefined`, functions, builtins and refs become `null` (and are
    /// omitted as object members); non-finite numbers become `null`; dates
    /// become ISO-8601 strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Undefined
            | Value::Null
            | Value::Function(_)
            | Value::Builtin(_)
            | Value::Ref(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .filter(|(_, v)| {
                        !matches!(
                            v,
                            Value::Undefined | Value::Function(_) | Value::Builtin(_) | Value::Ref(_)
                        )
                    })
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Date(ms) => time::to_iso_string(*ms).map_or(Json::Null, Json::String),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

// ── Display (host ToString) ──────────────────────────────────────────────────

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) | Value::Ref(_) => f.write_str("[object Object]"),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
            Value::Date(ms) => f.write_str(&time::to_display_string(*ms)),
            Value::Builtin(Builtin::Math) => f.write_str("[object Math]"),
            Value::Builtin(Builtin::Date) => f.write_str("function Date() { [native code] }"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Function(func) => write!(f, "{func:?}"),
            Value::Date(ms) => write!(f, "Date({ms})"),
            Value::Builtin(b) => write!(f, "Builtin({b:?})"),
            Value::Ref(r) => write!(f, "{r:?}"),
        }
    }
}

/// Structural equality, for tests and parity checks.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Date(a), Value::Date(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a.info() == b.info(),
            _ => false,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::object(map)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::array(items.iter().map(Value::from).collect()),
            Json::Object(map) => Value::object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Function
// ══════════════════════════════════════════════════════════════════════════════

/// Signature of a native callable: `(receiver, args) -> result`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync;

/// An application-supplied callable, optionally bound to a receiver.
///
/// Binding is explicit: [`Function::bind`] returns a new callable carrying
/// the receiver, and a bound callable ignores any receiver it is later
/// invoked with, matching the host's `Function.prototype.bind`.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: Arc<NativeFn>,
    receiver: Option<Box<Value>>,
}

impl Function {
    /// Create a callable that receives its receiver (`this`) and arguments.
    pub fn new(
        name: impl Into<Arc<str>>,
        body: impl Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Arc::new(body),
            receiver: None,
        }
    }

    /// Create a callable that ignores its receiver.
    pub fn from_fn(
        name: impl Into<Arc<str>>,
        body: impl Fn(&[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |_this, args| body(args))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The receiver this callable is bound to, if any.
    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.receiver.is_some()
    }

    /// Bind to `receiver`. Already-bound callables are returned unchanged.
    pub fn bind(&self, receiver: Value) -> Function {
        if self.is_bound() {
            return self.clone();
        }
        Function {
            name: self.name.clone(),
            body: self.body.clone(),
            receiver: Some(Box::new(receiver)),
        }
    }

    /// Invoke with the bound receiver, or `undefined` if unbound.
    pub fn call(&self, args: &[Value]) -> Result<Value, HostError> {
        self.call_with(&Value::Undefined, args)
    }

    /// Invoke as a method of `this`; a bound receiver takes precedence.
    pub fn call_with(&self, this: &Value, args: &[Value]) -> Result<Value, HostError> {
        let receiver = self.receiver.as_deref().unwrap_or(this);
        (self.body)(receiver, args)
    }

    /// Identity: same native body and same binding.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
            && match (&self.receiver, &other.receiver) {
                (None, None) => true,
                (Some(a), Some(b)) => a.strict_equals(b),
                _ => false,
            }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ElementRef
// ══════════════════════════════════════════════════════════════════════════════

/// What the host knows about a mounted element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// The `ref` name the element was registered under.
    pub name: String,
    /// Tag name, e.g. `input`.
    pub tag: String,
}

/// Opaque handle to a host element, produced by `resolve_ref`.
#[derive(Clone)]
pub struct ElementRef(Arc<ElementInfo>);

impl ElementRef {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self(Arc::new(ElementInfo {
            name: name.into(),
            tag: tag.into(),
        }))
    }

    pub fn info(&self) -> &ElementInfo {
        &self.0
    }

    pub fn ptr_eq(&self, other: &ElementRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref(<{}> {})", self.0.tag, self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_host() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::object(Object::new()).is_truthy());
        assert!(Value::from("0").is_truthy());
    }

    #[test]
    fn strict_equality_is_identity_for_composites() {
        let a = Value::array(vec![Value::from(1)]);
        let b = Value::array(vec![Value::from(1)]);
        assert!(a.strict_equals(&a.clone()));
        assert!(!a.strict_equals(&b));
        assert_eq!(a, b);
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(Value::Number(0.0).strict_equals(&Value::Number(-0.0)));
        assert!(!Value::from(1).strict_equals(&Value::from("1")));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
    }

    #[test]
    fn to_string_matches_host() {
        let arr = Value::array(vec![Value::from(1), Value::Null, Value::from("x")]);
        assert_eq!(arr.to_string(), "1,,x");
        assert_eq!(Value::object(Object::new()).to_string(), "[object Object]");
        assert_eq!(Value::Number(3.0).to_string(), "3");
    }

    #[test]
    fn to_number_matches_host() {
        assert!(Value::Undefined.to_number().is_nan());
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::array(vec![]).to_number(), 0.0);
        assert_eq!(Value::array(vec![Value::from("5")]).to_number(), 5.0);
        assert!(Value::object(Object::new()).to_number().is_nan());
    }

    #[test]
    fn json_round_trip_keeps_key_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"z":1,"a":[true,null],"m":"s"}"#).unwrap();
        let value = Value::from(&json);
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn json_output_omits_non_data_members() {
        let mut map = Object::new();
        map.insert("a".into(), Value::Undefined);
        map.insert("b".into(), Value::Number(f64::INFINITY));
        map.insert("math".into(), Value::Builtin(Builtin::Math));
        map.insert("input".into(), Value::Ref(ElementRef::new("email", "input")));
        map.insert("f".into(), Value::Function(Function::from_fn("f", |_| Ok(Value::Null))));
        let with_members = Value::object(map);
        assert_eq!(with_members.to_json().to_string(), r#"{"b":null}"#);

        let in_array = Value::array(vec![Value::Builtin(Builtin::Date), Value::Undefined]);
        assert_eq!(in_array.to_json().to_string(), "[null,null]");
    }

    #[test]
    fn bound_functions_keep_their_receiver() {
        let f = Function::new("whoami", |this, _| Ok(this.clone()));
        let bound = f.bind(Value::from("first"));
        let rebound = bound.bind(Value::from("second"));
        assert_eq!(rebound.call(&[]).unwrap(), Value::from("first"));
        assert_eq!(f.call(&[]).unwrap(), Value::Undefined);
        assert_eq!(bound.call_with(&Value::from("other"), &[]).unwrap(), Value::from("first"));
    }

    #[test]
    fn host_errors_pass_through_untouched() {
        let f = Function::from_fn("explode", |_| Err(HostError::new("kaboom")));
        assert_eq!(f.call(&[]).unwrap_err(), HostError::new("kaboom"));

        let named = Function::from_fn("fetch", |_| Err(HostError::new("offline").with_function("loadUser")));
        assert_eq!(named.call(&[]).unwrap_err().function.as_deref(), Some("loadUser"));
    }
}
