//! Allowlisted array methods.

use ripple_ir::number::to_integer;
use ripple_ir::{Expr, Value};

use super::{relative_index, Callback};
use crate::error::EvalResult;
use crate::evaluator::Evaluator;

pub(super) fn call(ev: &Evaluator<'_, '_>, items: &[Value], method: &str, args: &[Expr]) -> EvalResult<Value> {
    match method {
        "filter" | "map" | "find" | "findIndex" | "some" | "every" => {
            let callback = ev.callback(args.first())?;
            if matches!(callback, Callback::Invalid) {
                tracing::debug!(method, "array method called without a callable callback");
                return Ok(Value::Undefined);
            }
            higher_order(ev, items, method, &callback)
        }
        _ => Ok(simple(items, method, &ev.eval_args(args)?)),
    }
}

// ── Higher-order methods ─────────────────────────────────────────────────

fn higher_order(
    ev: &Evaluator<'_, '_>,
    items: &[Value],
    method: &str,
    callback: &Callback<'_>,
) -> EvalResult<Value> {
    let test = |index: usize, item: &Value| -> EvalResult<bool> {
        Ok(ev.invoke(callback, item, index)?.is_truthy())
    };
    let value = match method {
        "map" => {
            let mut mapped = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                mapped.push(ev.invoke(callback, item, index)?);
            }
            Value::array(mapped)
        }
        "filter" => {
            let mut kept = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if test(index, item)? {
                    kept.push(item.clone());
                }
            }
            Value::array(kept)
        }
        "find" => {
            for (index, item) in items.iter().enumerate() {
                if test(index, item)? {
                    return Ok(item.clone());
                }
            }
            Value::Undefined
        }
        "findIndex" => {
            for (index, item) in items.iter().enumerate() {
                if test(index, item)? {
                    return Ok(Value::Number(index as f64));
                }
            }
            Value::Number(-1.0)
        }
        "some" => {
            for (index, item) in items.iter().enumerate() {
                if test(index, item)? {
                    return Ok(Value::Bool(true));
                }
            }
            Value::Bool(false)
        }
        "every" => {
            for (index, item) in items.iter().enumerate() {
                if !test(index, item)? {
                    return Ok(Value::Bool(false));
                }
            }
            Value::Bool(true)
        }
        _ => Value::Undefined,
    };
    Ok(value)
}

// ── Plain methods ────────────────────────────────────────────────────────

fn simple(items: &[Value], method: &str, args: &[Value]) -> Value {
    let len = items.len();
    let search = args.first().cloned().unwrap_or_default();
    match method {
        "length" => Value::Number(len as f64),
        "at" => {
            let n = to_integer(args.first().map_or(0.0, Value::to_number));
            let index = if n < 0.0 { len as f64 + n } else { n };
            if index < 0.0 || index >= len as f64 {
                return Value::Undefined;
            }
            items[index as usize].clone()
        }
        "slice" => {
            let start = relative_index(args.first(), len, 0);
            let end = relative_index(args.get(1), len, len);
            Value::array(items[start..end.max(start)].to_vec())
        }
        "includes" => {
            let from = relative_index(args.get(1), len, 0);
            Value::Bool(items[from..].iter().any(|item| item.same_value_zero(&search)))
        }
        "indexOf" => {
            let from = relative_index(args.get(1), len, 0);
            let found = items[from..].iter().position(|item| item.strict_equals(&search));
            Value::Number(found.map_or(-1.0, |i| (i + from) as f64))
        }
        "join" => {
            let separator = match args.first() {
                None | Some(Value::Undefined) => ",".to_string(),
                Some(sep) => sep.to_js_string(),
            };
            let parts: Vec<String> = items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_js_string()
                    }
                })
                .collect();
            Value::String(parts.join(&separator))
        }
        _ => Value::Undefined,
    }
}
