//! Allowlisted string methods.
//!
//! Positions and lengths are counted in UTF-16 code units, as the host
//! runtime counts them, so server and client agree on `"é".length` and
//! friends.

use ripple_ir::number::{is_host_whitespace, to_integer};
use ripple_ir::Value;

use super::relative_index;

pub(crate) fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// The code unit at `index` as a one-unit string.
pub(crate) fn char_at(s: &str, index: usize) -> Option<String> {
    s.encode_utf16()
        .nth(index)
        .map(|unit| String::from_utf16_lossy(&[unit]))
}

fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn from_units(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// A string argument, with `undefined` stringified as the host does.
fn string_arg(args: &[Value], index: usize) -> String {
    args.get(index).cloned().unwrap_or_default().to_js_string()
}

/// Clamp a position argument into `0..=len`, `default` when absent.
fn clamped(arg: Option<&Value>, len: usize, default: usize) -> usize {
    match arg.filter(|v| !v.is_undefined()) {
        Some(v) => to_integer(v.to_number()).clamp(0.0, len as f64) as usize,
        None => default,
    }
}

fn find_units(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

pub(super) fn call(s: &str, method: &str, args: &[Value]) -> Value {
    match method {
        "length" => Value::Number(utf16_len(s) as f64),
        "trim" => Value::from(s.trim_matches(is_host_whitespace)),
        "toUpperCase" => Value::String(s.to_uppercase()),
        "toLowerCase" => Value::String(s.to_lowercase()),
        "replace" => {
            let pattern = string_arg(args, 0);
            let replacement = string_arg(args, 1);
            Value::String(s.replacen(&pattern, &replacement, 1))
        }
        "split" => split(s, args),
        _ => positional(s, method, args),
    }
}

fn split(s: &str, args: &[Value]) -> Value {
    let limit = match args.get(1) {
        None | Some(Value::Undefined) => usize::MAX,
        Some(n) => {
            let n = to_integer(n.to_number());
            if n.is_finite() {
                n.rem_euclid(4_294_967_296.0) as usize
            } else {
                0
            }
        }
    };
    let parts: Vec<Value> = match args.first() {
        None | Some(Value::Undefined) => vec![Value::from(s)],
        Some(sep) => {
            let sep = sep.to_js_string();
            if sep.is_empty() {
                units(s)
                    .iter()
                    .map(|unit| Value::String(from_units(&[*unit])))
                    .collect()
            } else {
                s.split(sep.as_str()).map(Value::from).collect()
            }
        }
    };
    Value::array(parts.into_iter().take(limit).collect())
}

/// Methods that take UTF-16 positions.
fn positional(s: &str, method: &str, args: &[Value]) -> Value {
    let text = units(s);
    let len = text.len();
    match method {
        "charAt" => {
            let n = to_integer(args.first().map_or(0.0, Value::to_number));
            if n < 0.0 || n >= len as f64 {
                return Value::from("");
            }
            Value::String(from_units(&text[n as usize..=n as usize]))
        }
        "substring" => {
            let start = clamped(args.first(), len, 0);
            let end = clamped(args.get(1), len, len);
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            Value::String(from_units(&text[lo..hi]))
        }
        "slice" => {
            let start = relative_index(args.first(), len, 0);
            let end = relative_index(args.get(1), len, len);
            Value::String(from_units(&text[start..end.max(start)]))
        }
        "includes" => {
            let search = units(&string_arg(args, 0));
            let from = clamped(args.get(1), len, 0);
            Value::Bool(find_units(&text, &search, from).is_some())
        }
        "indexOf" => {
            let search = units(&string_arg(args, 0));
            let from = clamped(args.get(1), len, 0);
            Value::Number(find_units(&text, &search, from).map_or(-1.0, |i| i as f64))
        }
        "startsWith" => {
            let search = units(&string_arg(args, 0));
            let from = clamped(args.get(1), len, 0);
            Value::Bool(text[from..].starts_with(&search))
        }
        "endsWith" => {
            let search = units(&string_arg(args, 0));
            let end = clamped(args.get(1), len, len);
            Value::Bool(text[..end].ends_with(&search))
        }
        _ => Value::Undefined,
    }
}
