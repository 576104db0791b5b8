//! Allowlisted `Date` statics and instance methods. All in UTC.

use chrono::{Datelike, Timelike, Utc};
use ripple_ir::time::{parse_date, to_datetime, to_iso_string};
use ripple_ir::Value;

const LOCALE_DATE: &str = "%-m/%-d/%Y";
const LOCALE_TIME: &str = "%-I:%M:%S %p";

pub(super) fn call_static(method: &str, args: &[Value]) -> Value {
    match method {
        "now" => Value::Number(Utc::now().timestamp_millis() as f64),
        "parse" => {
            let text = args.first().cloned().unwrap_or_default().to_js_string();
            Value::Number(parse_date(&text))
        }
        _ => Value::Undefined,
    }
}

pub(super) fn call_instance(ms: f64, method: &str) -> Value {
    if method == "getTime" {
        return Value::Number(if ms.is_finite() { ms.trunc() } else { f64::NAN });
    }
    if method == "toISOString" {
        return to_iso_string(ms).map_or(Value::Undefined, Value::String);
    }

    let Some(dt) = to_datetime(ms) else {
        return match method {
            "toDateString" | "toLocaleDateString" | "toLocaleTimeString" | "toLocaleString" => {
                Value::from("Invalid Date")
            }
            _ => Value::Number(f64::NAN),
        };
    };
    let number = |n: u32| Value::Number(f64::from(n));
    match method {
        "getFullYear" => Value::Number(f64::from(dt.year())),
        "getMonth" => number(dt.month0()),
        "getDate" => number(dt.day()),
        "getDay" => number(dt.weekday().num_days_from_sunday()),
        "getHours" => number(dt.hour()),
        "getMinutes" => number(dt.minute()),
        "getSeconds" => number(dt.second()),
        "getMilliseconds" => number(dt.timestamp_subsec_millis()),
        "toDateString" => Value::String(dt.format("%a %b %d %Y").to_string()),
        "toLocaleDateString" => Value::String(dt.format(LOCALE_DATE).to_string()),
        "toLocaleTimeString" => Value::String(dt.format(LOCALE_TIME).to_string()),
        "toLocaleString" => Value::String(format!(
            "{}, {}",
            dt.format(LOCALE_DATE),
            dt.format(LOCALE_TIME)
        )),
        _ => Value::Undefined,
    }
}
