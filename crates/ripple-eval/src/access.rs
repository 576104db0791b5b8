//! Property access: the single path every key read goes through.
//!
//! Forbidden keys are rejected here before any value is read, whether the key
//! came from a dot path, a dynamic index, or a method name. A rejected or
//! missing step yields `undefined` and ends the chain.

use ripple_ir::number::canonical_index;
use ripple_ir::{Builtin, Value};
use tracing::debug;

use crate::methods::string::{char_at, utf16_len};
use crate::policy;

/// Split a dot path into its segments. Empty segments are ignored.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Reject forbidden keys, logging the attempt.
pub(crate) fn allowed(key: &str) -> bool {
    if policy::is_forbidden_key(key) {
        debug!(key, "forbidden property key rejected");
        false
    } else {
        true
    }
}

/// Read one own property of `base`.
pub(crate) fn property(base: &Value, key: &str) -> Value {
    if !allowed(key) {
        return Value::Undefined;
    }
    match base {
        Value::Object(map) => map.get(key).cloned().unwrap_or_default(),
        Value::Array(items) => {
            if key == "length" {
                return Value::Number(items.len() as f64);
            }
            canonical_index(key)
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default()
        }
        Value::String(s) => {
            if key == "length" {
                return Value::Number(utf16_len(s) as f64);
            }
            canonical_index(key)
                .and_then(|i| char_at(s, i))
                .map_or(Value::Undefined, Value::String)
        }
        Value::Builtin(Builtin::Math) => math_constant(key).map_or(Value::Undefined, Value::Number),
        _ => Value::Undefined,
    }
}

fn math_constant(key: &str) -> Option<f64> {
    use std::f64::consts;
    let value = match key {
        "PI" => consts::PI,
        "E" => consts::E,
        "LN2" => consts::LN_2,
        "LN10" => consts::LN_10,
        "LOG2E" => consts::LOG2_E,
        "LOG10E" => consts::LOG10_E,
        "SQRT2" => consts::SQRT_2,
        "SQRT1_2" => consts::FRAC_1_SQRT_2,
        _ => return None,
    };
    Some(value)
}

/// The end of a traversal and the value that held it.
#[derive(Debug)]
pub(crate) struct Traversal {
    pub value: Value,
    /// Set when at least one property hop was taken.
    pub parent: Option<Value>,
}

impl Traversal {
    fn undefined() -> Self {
        Self {
            value: Value::Undefined,
            parent: None,
        }
    }
}

/// Follow `path` from `base`, short-circuiting on nullish values and
/// forbidden keys.
pub(crate) fn traverse<'p>(base: Value, path: impl IntoIterator<Item = &'p str>) -> Traversal {
    let mut current = base;
    let mut parent = None;
    for key in path {
        if !allowed(key) || current.is_nullish() {
            return Traversal::undefined();
        }
        let next = property(&current, key);
        parent = Some(current);
        current = next;
    }
    Traversal {
        value: current,
        parent,
    }
}

/// Follow `path` from `base` and return only the final value.
pub(crate) fn get_path<'p>(base: Value, path: impl IntoIterator<Item = &'p str>) -> Value {
    traverse(base, path).value
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_ir::Object;

    fn user() -> Value {
        let mut address = Object::new();
        address.insert("city".into(), Value::from("Oslo"));
        let mut user = Object::new();
        user.insert("name".into(), Value::from("Ada"));
        user.insert("address".into(), Value::object(address));
        user.insert(
            "tags".into(),
            Value::array(vec![Value::from("a"), Value::from("b")]),
        );
        Value::object(user)
    }

    #[test]
    fn walks_nested_paths() {
        assert_eq!(get_path(user(), segments("address.city")), Value::from("Oslo"));
        assert_eq!(get_path(user(), segments("tags.1")), Value::from("b"));
        assert_eq!(get_path(user(), segments("tags.length")), Value::from(2));
        assert_eq!(get_path(user(), segments("name.length")), Value::from(3));
    }

    #[test]
    fn missing_steps_short_circuit() {
        assert_eq!(get_path(user(), segments("address.zip.code")), Value::Undefined);
        assert_eq!(get_path(Value::Null, segments("a")), Value::Undefined);
    }

    #[test]
    fn forbidden_keys_end_the_chain() {
        for path in ["__proto__", "address.constructor", "constructor.prototype", "tags.__proto__.x"] {
            assert_eq!(get_path(user(), segments(path)), Value::Undefined, "{path}");
        }
    }

    #[test]
    fn traversal_reports_parent() {
        let t = traverse(user(), segments("address.city"));
        assert_eq!(t.value, Value::from("Oslo"));
        assert_eq!(t.parent.unwrap().as_object().unwrap().len(), 1);
        assert!(traverse(user(), segments("")).parent.is_none());
    }

    #[test]
    fn math_constants() {
        let math = Value::Builtin(Builtin::Math);
        assert_eq!(property(&math, "PI"), Value::Number(std::f64::consts::PI));
        assert_eq!(property(&math, "random"), Value::Undefined);
    }
}
