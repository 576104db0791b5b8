//! Safety policy: the closed-world tables that bound what expressions can reach.
//!
//! These are compile-time constants. Widening the sandbox means editing this
//! file; there is deliberately no runtime registration API.

/// Methods callable on array values.
pub const SAFE_ARRAY_METHODS: &[&str] = &[
    "length",
    "at",
    "includes",
    "slice",
    "indexOf",
    "join",
    "filter",
    "map",
    "find",
    "findIndex",
    "some",
    "every",
];

/// Methods callable on string values.
pub const SAFE_STRING_METHODS: &[&str] = &[
    "length",
    "charAt",
    "substring",
    "slice",
    "split",
    "trim",
    "toUpperCase",
    "toLowerCase",
    "replace",
    "includes",
    "startsWith",
    "endsWith",
    "indexOf",
];

/// Functions callable on the `Math` namespace. `random` is absent: server and
/// client renders of the same frame must agree.
pub const SAFE_MATH_METHODS: &[&str] = &[
    "min", "max", "round", "floor", "ceil", "abs", "sqrt", "pow", "sin", "cos", "tan",
];

/// Functions callable on the `Date` constructor.
pub const SAFE_DATE_STATIC_METHODS: &[&str] = &["now", "parse"];

/// Methods callable on date values.
pub const SAFE_DATE_INSTANCE_METHODS: &[&str] = &[
    "getTime",
    "getFullYear",
    "getMonth",
    "getDate",
    "getDay",
    "getHours",
    "getMinutes",
    "getSeconds",
    "getMilliseconds",
    "toISOString",
    "toDateString",
    "toLocaleDateString",
    "toLocaleTimeString",
    "toLocaleString",
];

/// Property keys that are never traversed, whatever the base value.
pub const FORBIDDEN_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

pub fn is_forbidden_key(key: &str) -> bool {
    FORBIDDEN_KEYS.contains(&key)
}

pub fn is_safe_array_method(method: &str) -> bool {
    SAFE_ARRAY_METHODS.contains(&method)
}

pub fn is_safe_string_method(method: &str) -> bool {
    SAFE_STRING_METHODS.contains(&method)
}

pub fn is_safe_math_method(method: &str) -> bool {
    SAFE_MATH_METHODS.contains(&method)
}

pub fn is_safe_date_static_method(method: &str) -> bool {
    SAFE_DATE_STATIC_METHODS.contains(&method)
}

pub fn is_safe_date_instance_method(method: &str) -> bool {
    SAFE_DATE_INSTANCE_METHODS.contains(&method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_keys_cover_prototype_access() {
        for key in ["__proto__", "constructor", "prototype"] {
            assert!(is_forbidden_key(key), "{key} must be forbidden");
        }
        assert!(!is_forbidden_key("proto"));
        assert!(!is_forbidden_key("Constructor"));
    }

    #[test]
    fn allowlists_are_disjoint_from_forbidden_keys() {
        let tables = [
            SAFE_ARRAY_METHODS,
            SAFE_STRING_METHODS,
            SAFE_MATH_METHODS,
            SAFE_DATE_STATIC_METHODS,
            SAFE_DATE_INSTANCE_METHODS,
        ];
        for table in tables {
            for method in table {
                assert!(!is_forbidden_key(method));
            }
        }
    }

    #[test]
    fn dangerous_methods_are_not_allowlisted() {
        assert!(!is_safe_array_method("push"));
        assert!(!is_safe_array_method("splice"));
        assert!(!is_safe_string_method("constructor"));
        assert!(!is_safe_math_method("random"));
        assert!(!is_safe_date_instance_method("setFullYear"));
    }
}
