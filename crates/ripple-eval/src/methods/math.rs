//! Allowlisted `Math` functions.

use ripple_ir::Value;

fn arg(args: &[Value], index: usize) -> f64 {
    args.get(index).map_or(f64::NAN, Value::to_number)
}

pub(super) fn call(method: &str, args: &[Value]) -> Value {
    let x = arg(args, 0);
    let n = match method {
        "min" => args
            .iter()
            .map(Value::to_number)
            .fold(f64::INFINITY, |acc, n| if acc.is_nan() || n.is_nan() { f64::NAN } else { acc.min(n) }),
        "max" => args
            .iter()
            .map(Value::to_number)
            .fold(f64::NEG_INFINITY, |acc, n| if acc.is_nan() || n.is_nan() { f64::NAN } else { acc.max(n) }),
        "round" => round(x),
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        "abs" => x.abs(),
        "sqrt" => x.sqrt(),
        "pow" => pow(x, arg(args, 1)),
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        _ => return Value::Undefined,
    };
    Value::Number(n)
}

/// Halves round toward +∞: `round(-2.5)` is `-2`.
fn round(x: f64) -> f64 {
    if !x.is_finite() || x.fract() == 0.0 {
        return x;
    }
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// `powf` except where the host answers `NaN`.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}
