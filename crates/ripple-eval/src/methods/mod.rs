//! `call` dispatch and the sandboxed built-in methods.
//!
//! Built-in receivers (arrays, strings, `Math`, `Date`, dates) only accept
//! methods from their [`policy`](crate::policy) allowlist; anything else is
//! refused with `undefined` and no argument is evaluated. Application
//! functions reached through locals, imports or globals are exempt from the
//! allowlists but still go through forbidden-key checks.

mod array;
mod date;
mod math;
pub(crate) mod string;

use ripple_ir::number::to_integer;
use ripple_ir::{Builtin, Expr, Function, Value};
use tracing::{debug, trace};

use crate::access;
use crate::context::Locals;
use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::policy;

/// Resolve a relative position argument (`slice`, `at`-style) against `len`.
/// Negative values count from the end; the result is clamped to `0..=len`.
pub(crate) fn relative_index(arg: Option<&Value>, len: usize, default: usize) -> usize {
    let Some(arg) = arg.filter(|v| !v.is_undefined()) else {
        return default;
    };
    let n = to_integer(arg.to_number());
    let len = len as f64;
    let index = if n < 0.0 { (len + n).max(0.0) } else { n.min(len) };
    index as usize
}

/// A callback argument of a higher-order array method.
pub(crate) enum Callback<'e> {
    /// A `lambda` node with the scope it was written in.
    Lambda {
        param: &'e str,
        index: Option<&'e str>,
        body: &'e Expr,
        captured: Locals,
    },
    /// An application function value.
    Function(Function),
    /// Anything else; not callable.
    Invalid,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    // ══════════════════════════════════════════════════════════════════════
    // Call dispatch
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn eval_call(
        &self,
        target: Option<&Expr>,
        method: &str,
        args: &[Expr],
    ) -> EvalResult<Value> {
        let Some(target) = target else {
            return self.call_global(method, args);
        };
        let receiver = self.eval_expr(target)?;
        match &receiver {
            Value::Array(items) if policy::is_safe_array_method(method) => {
                array::call(self, items, method, args)
            }
            Value::String(s) if policy::is_safe_string_method(method) => {
                Ok(string::call(s, method, &self.eval_args(args)?))
            }
            Value::Builtin(Builtin::Math) if policy::is_safe_math_method(method) => {
                Ok(math::call(method, &self.eval_args(args)?))
            }
            Value::Builtin(Builtin::Date) if policy::is_safe_date_static_method(method) => {
                Ok(date::call_static(method, &self.eval_args(args)?))
            }
            Value::Date(ms) if policy::is_safe_date_instance_method(method) => {
                Ok(date::call_instance(*ms, method))
            }
            Value::Array(_) | Value::String(_) | Value::Builtin(_) | Value::Date(_) => {
                debug!(
                    method,
                    receiver = receiver.type_name(),
                    "method not in allowlist refused"
                );
                Ok(Value::Undefined)
            }
            Value::Undefined | Value::Null => {
                trace!(method, "call on nullish receiver");
                Ok(Value::Undefined)
            }
            _ => self.call_member(&receiver, method, args),
        }
    }

    /// `target: null`: look `method` up in the plugin registry.
    fn call_global(&self, method: &str, args: &[Expr]) -> EvalResult<Value> {
        let Some(function) = self.ctx.functions.and_then(|f| f.get(method)) else {
            debug!(function = method, "unknown global function");
            return Ok(Value::Undefined);
        };
        let args = self.eval_args(args)?;
        trace!(function = method, argc = args.len(), "calling global function");
        Ok(self
            .ctx
            .env
            .call_function(function, &Value::Undefined, &args)?)
    }

    /// An application function stored as a property of `receiver`.
    fn call_member(&self, receiver: &Value, method: &str, args: &[Expr]) -> EvalResult<Value> {
        let Value::Function(function) = access::property(receiver, method) else {
            debug!(method, "call target has no such function");
            return Ok(Value::Undefined);
        };
        let args = self.eval_args(args)?;
        trace!(method, argc = args.len(), "calling member function");
        Ok(self.ctx.env.call_function(&function, receiver, &args)?)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Callbacks
    // ══════════════════════════════════════════════════════════════════════

    /// Turn a higher-order method argument into a callback. `lambda` nodes
    /// are captured unevaluated; anything else is evaluated and must be a
    /// function.
    pub(crate) fn callback<'e>(&self, arg: Option<&'e Expr>) -> EvalResult<Callback<'e>> {
        match arg {
            Some(Expr::Lambda { param, index, body }) => Ok(Callback::Lambda {
                param,
                index: index.as_deref(),
                body,
                captured: self.ctx.locals.clone(),
            }),
            Some(other) => match self.eval_expr(other)? {
                Value::Function(function) => Ok(Callback::Function(function)),
                _ => Ok(Callback::Invalid),
            },
            None => Ok(Callback::Invalid),
        }
    }

    /// Invoke a callback for one element. Each invocation gets a fresh scope
    /// over the captured one.
    pub(crate) fn invoke(&self, callback: &Callback<'_>, element: &Value, index: usize) -> EvalResult<Value> {
        match callback {
            Callback::Lambda {
                param,
                index: index_name,
                body,
                captured,
            } => {
                let mut bindings = vec![(param.to_string(), element.clone())];
                if let Some(name) = index_name {
                    bindings.push((name.to_string(), Value::Number(index as f64)));
                }
                let scope = self.ctx.scoped(captured.extend(bindings));
                Evaluator::new(&scope).eval_expr(body)
            }
            Callback::Function(function) => Ok(self.ctx.env.call_function(
                function,
                &Value::Undefined,
                &[element.clone(), Value::Number(index as f64)],
            )?),
            Callback::Invalid => Ok(Value::Undefined),
        }
    }
}
