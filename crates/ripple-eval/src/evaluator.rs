//! Core expression evaluator.

use ripple_ir::{BinOp, Expr, Object, RouteSource, Value};
use tracing::debug;

use crate::access::{self, segments};
use crate::context::EvalContext;
use crate::error::EvalResult;
use crate::operators;
use crate::style;

/// Evaluate `expr` against `ctx`.
///
/// Missing values and sandbox rejections evaluate to `undefined`; the only
/// error is one raised by an application function.
pub fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> EvalResult<Value> {
    Evaluator::new(ctx).eval_expr(expr)
}

/// Walks IR nodes and produces values. Holds nothing but the context.
pub(crate) struct Evaluator<'c, 'a> {
    pub(crate) ctx: &'c EvalContext<'a>,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    pub(crate) fn new(ctx: &'c EvalContext<'a>) -> Self {
        Self { ctx }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub(crate) fn eval_expr(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Lit { value } => Ok(value.clone()),
            Expr::State { name, path } => Ok(self.eval_state(name, path.as_deref())),
            Expr::Local { name } => Ok(self.eval_local(name)),
            Expr::Var { name, path } => Ok(self.eval_var(name, path.as_deref())),
            Expr::Route { name, source } => Ok(self.eval_route(name, *source)),
            Expr::Import { name, path } | Expr::Data { name, path } => {
                Ok(self.eval_import(name, path.as_deref()))
            }
            Expr::Ref { name } => Ok(self.ctx.env.resolve_ref(name)),
            Expr::Param { .. } => Ok(Value::Undefined),

            Expr::Bin { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Not { operand } => Ok(Value::Bool(!self.eval_expr(operand)?.is_truthy())),
            Expr::Cond {
                condition,
                then,
                otherwise,
            } => self.eval_cond(condition, then, otherwise.as_deref()),

            Expr::Get { base, path } => {
                let base = self.eval_expr(base)?;
                Ok(access::get_path(base, segments(path)))
            }
            Expr::Index { base, key } => self.eval_index(base, key),

            Expr::Style { name, variants } => {
                style::compose(name, variants, self.ctx).map(Value::String)
            }
            Expr::Concat { items } => self.eval_concat(items),
            Expr::Validity { ref_name, property } => Ok(Value::Bool(
                self.ctx.env.resolve_validity(ref_name, property.as_deref()),
            )),
            Expr::Call {
                target,
                method,
                args,
            } => self.eval_call(target.as_deref(), method, args),
            Expr::Lambda { .. } => Ok(Value::Undefined),
            Expr::Array { elements } => self.eval_array(elements),
            Expr::Obj { props } => self.eval_object(props),

            Expr::Unknown => {
                debug!("unknown expression kind evaluated as undefined");
                Ok(Value::Undefined)
            }
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────────

    fn eval_state(&self, name: &str, path: Option<&str>) -> Value {
        if !access::allowed(name) {
            return Value::Undefined;
        }
        let root = self.ctx.state.get(name);
        access::get_path(root, path.into_iter().flat_map(segments))
    }

    fn eval_local(&self, name: &str) -> Value {
        if !access::allowed(name) {
            return Value::Undefined;
        }
        self.ctx.locals.get(name).cloned().unwrap_or_default()
    }

    /// `var`: the first segment of the dotted name is looked up in locals and
    /// the rest (plus `path`) traversed from there. A name with no local root
    /// goes to the host globals whole; if that misses and the name is dotted,
    /// the first segment alone is resolved as a global and traversed.
    ///
    /// A function reached through at least one hop is rebound to the value
    /// that held it, so calling it later keeps the right receiver.
    fn eval_var(&self, name: &str, path: Option<&str>) -> Value {
        let mut parts = name.split('.');
        let head = parts.next().unwrap_or(name);
        let tail = parts.chain(path.into_iter().flat_map(segments));

        if !access::allowed(head) {
            return Value::Undefined;
        }
        if let Some(root) = self.ctx.locals.get(head) {
            return self.rebind(access::traverse(root.clone(), tail));
        }

        let whole = self.ctx.env.resolve_global(name);
        if !whole.is_undefined() || !name.contains('.') {
            return self.rebind(access::traverse(whole, path.into_iter().flat_map(segments)));
        }
        let root = self.ctx.env.resolve_global(head);
        self.rebind(access::traverse(root, tail))
    }

    fn rebind(&self, traversal: access::Traversal) -> Value {
        match (traversal.value, traversal.parent) {
            (Value::Function(function), Some(parent)) => {
                Value::Function(self.ctx.env.bind_function(function, &parent))
            }
            (value, _) => value,
        }
    }

    fn eval_route(&self, name: &str, source: RouteSource) -> Value {
        let Some(route) = self.ctx.route else {
            return Value::from("");
        };
        let table = match source {
            RouteSource::Path => return Value::String(route.path.clone()),
            RouteSource::Param => &route.params,
            RouteSource::Query => &route.query,
        };
        if !access::allowed(name) {
            return Value::Undefined;
        }
        table.get(name).map_or(Value::Undefined, |v| Value::String(v.clone()))
    }

    fn eval_import(&self, name: &str, path: Option<&str>) -> Value {
        if !access::allowed(name) {
            return Value::Undefined;
        }
        let root = self
            .ctx
            .imports
            .and_then(|imports| imports.get(name))
            .cloned()
            .unwrap_or_default();
        access::get_path(root, path.into_iter().flat_map(segments))
    }

    fn eval_index(&self, base: &Expr, key: &Expr) -> EvalResult<Value> {
        let base = self.eval_expr(base)?;
        let key = self.eval_expr(key)?;
        if base.is_nullish() {
            return Ok(Value::Undefined);
        }
        Ok(access::property(&base, &key.to_js_string()))
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&self, op: BinOp, left: &Expr, right: &Expr) -> EvalResult<Value> {
        match op {
            BinOp::And => {
                let lv = self.eval_expr(left)?;
                if !lv.is_truthy() {
                    return Ok(lv);
                }
                self.eval_expr(right)
            }
            BinOp::Or => {
                let lv = self.eval_expr(left)?;
                if lv.is_truthy() {
                    return Ok(lv);
                }
                self.eval_expr(right)
            }
            BinOp::Unknown => {
                debug!("unknown binary operator evaluated as undefined");
                Ok(Value::Undefined)
            }
            _ => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                Ok(operators::apply(op, &lv, &rv))
            }
        }
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn eval_cond(&self, condition: &Expr, then: &Expr, otherwise: Option<&Expr>) -> EvalResult<Value> {
        if self.eval_expr(condition)?.is_truthy() {
            self.eval_expr(then)
        } else if let Some(otherwise) = otherwise {
            self.eval_expr(otherwise)
        } else {
            Ok(Value::Undefined)
        }
    }

    // ── Composites ───────────────────────────────────────────────────────

    fn eval_concat(&self, items: &[Expr]) -> EvalResult<Value> {
        let mut result = String::new();
        for item in items {
            let value = self.eval_expr(item)?;
            if !value.is_nullish() {
                result.push_str(&value.to_js_string());
            }
        }
        Ok(Value::String(result))
    }

    fn eval_array(&self, elements: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.eval_expr(element)?);
        }
        Ok(Value::array(values))
    }

    fn eval_object(&self, props: &indexmap::IndexMap<String, Expr>) -> EvalResult<Value> {
        let mut fields = Object::with_capacity(props.len());
        for (key, expr) in props {
            fields.insert(key.clone(), self.eval_expr(expr)?);
        }
        Ok(Value::object(fields))
    }

    /// Evaluate call arguments in order.
    pub(crate) fn eval_args(&self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }
}
