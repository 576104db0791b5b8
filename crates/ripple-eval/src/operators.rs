//! Binary operators with host-language coercion semantics.
//!
//! `&&` and `||` are not here: they short-circuit and live in the evaluator.

use std::cmp::Ordering;

use ripple_ir::{BinOp, Value};

/// Apply a non-short-circuit operator to two evaluated operands.
pub(crate) fn apply(op: BinOp, left: &Value, right: &Value) -> Value {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinOp::Eq => Value::Bool(left.strict_equals(right)),
        BinOp::NotEq => Value::Bool(!left.strict_equals(right)),
        BinOp::Less => compare(left, right, Ordering::is_lt),
        BinOp::LessEq => compare(left, right, Ordering::is_le),
        BinOp::Greater => compare(left, right, Ordering::is_gt),
        BinOp::GreaterEq => compare(left, right, Ordering::is_ge),
        BinOp::And | BinOp::Or | BinOp::Unknown => Value::Undefined,
    }
}

/// `+`: string concatenation if either primitive operand is a string,
/// numeric addition otherwise.
fn add(left: &Value, right: &Value) -> Value {
    let l = to_primitive(left, Hint::Default);
    let r = to_primitive(right, Hint::Default);
    if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
        Value::String(format!("{l}{r}"))
    } else {
        Value::Number(l.to_number() + r.to_number())
    }
}

/// Relational comparison: strings compare by UTF-16 code units, everything
/// else numerically, and any `NaN` makes the comparison false.
fn compare(left: &Value, right: &Value, test: fn(Ordering) -> bool) -> Value {
    let l = to_primitive(left, Hint::Number);
    let r = to_primitive(right, Hint::Number);
    let ordering = match (&l, &r) {
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => l.to_number().partial_cmp(&r.to_number()),
    };
    Value::Bool(ordering.is_some_and(test))
}

#[derive(Clone, Copy)]
enum Hint {
    Default,
    Number,
}

/// Reduce an object-like value to a primitive, as the host's `ToPrimitive`.
fn to_primitive(value: &Value, hint: Hint) -> Value {
    match value {
        Value::Date(ms) => match hint {
            Hint::Number => Value::Number(*ms),
            Hint::Default => Value::String(value.to_string()),
        },
        v if v.is_primitive() => v.clone(),
        v => Value::String(v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn s(v: &str) -> Value {
        Value::from(v)
    }

    #[test]
    fn addition_and_concatenation() {
        assert_eq!(apply(BinOp::Add, &n(3.0), &n(4.0)), n(7.0));
        assert_eq!(apply(BinOp::Add, &s("a"), &n(1.0)), s("a1"));
        assert_eq!(apply(BinOp::Add, &n(1.0), &s("a")), s("1a"));
        assert_eq!(apply(BinOp::Add, &n(1.0), &Value::Null), n(1.0));
        assert_eq!(apply(BinOp::Add, &Value::Bool(true), &n(1.0)), n(2.0));
        assert_eq!(
            apply(BinOp::Add, &Value::array(vec![n(1.0), n(2.0)]), &n(3.0)),
            s("1,23")
        );
        assert!(apply(BinOp::Add, &Value::Undefined, &n(1.0))
            .as_number()
            .unwrap()
            .is_nan());
    }

    #[test]
    fn arithmetic_coerces_to_number() {
        assert_eq!(apply(BinOp::Sub, &s("10"), &n(4.0)), n(6.0));
        assert_eq!(apply(BinOp::Mul, &s("3"), &s("4")), n(12.0));
        assert_eq!(apply(BinOp::Mod, &n(-7.0), &n(3.0)), n(-1.0));
        assert_eq!(apply(BinOp::Div, &n(10.0), &n(0.0)), n(f64::INFINITY));
        assert_eq!(apply(BinOp::Div, &n(-1.0), &n(0.0)), n(f64::NEG_INFINITY));
        assert!(apply(BinOp::Div, &n(0.0), &n(0.0)).as_number().unwrap().is_nan());
    }

    #[test]
    fn equality_is_strict() {
        assert_eq!(apply(BinOp::Eq, &n(1.0), &s("1")), Value::Bool(false));
        assert_eq!(apply(BinOp::Eq, &Value::Null, &Value::Undefined), Value::Bool(false));
        assert_eq!(apply(BinOp::NotEq, &n(0.0), &Value::Bool(false)), Value::Bool(true));
        assert_eq!(apply(BinOp::Eq, &s("x"), &s("x")), Value::Bool(true));
    }

    #[test]
    fn relational_comparisons() {
        assert_eq!(apply(BinOp::Less, &n(2.0), &n(10.0)), Value::Bool(true));
        assert_eq!(apply(BinOp::Less, &s("2"), &s("10")), Value::Bool(false));
        assert_eq!(apply(BinOp::Less, &s("2"), &n(10.0)), Value::Bool(true));
        assert_eq!(apply(BinOp::GreaterEq, &n(5.0), &n(5.0)), Value::Bool(true));
        assert_eq!(apply(BinOp::Greater, &n(f64::NAN), &n(1.0)), Value::Bool(false));
        assert_eq!(apply(BinOp::LessEq, &Value::Undefined, &n(0.0)), Value::Bool(false));
        assert_eq!(apply(BinOp::LessEq, &Value::Null, &n(0.0)), Value::Bool(true));
    }
}
