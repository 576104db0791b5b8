//! Ripple evaluator as a WASM module for browser environments.
//!
//! This crate exposes expression and style evaluation via `wasm-bindgen`.
//! Nodes are the compiler's JSON IR; the evaluation context travels as a
//! JSON [`ClientFrame`].
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { evaluate } from 'ripple-wasm';
//!
//! await init();
//!
//! const node = { expr: "state", name: "user", path: "name" };
//! const frame = { state: { user: { name: "Ada" } } };
//! console.log(JSON.parse(evaluate(JSON.stringify(node), JSON.stringify(frame))));
//! // { ok: true, value: "Ada" }
//! ```

use indexmap::IndexMap;
use ripple_eval::{
    policy, ClientEnvironment, EvalContext, EvalResult, Imports, Locals, RouteContext, StyleTable,
};
use ripple_ir::{Expr, Value};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Everything a browser-side evaluation may read, as sent from JavaScript.
///
/// ```json
/// {
///   "state": { "count": 1 },
///   "locals": { "item": { "id": 7 } },
///   "route": { "params": { "id": "7" }, "query": {}, "path": "/items/7" },
///   "imports": {},
///   "styles": { "button": { "base": "btn" } }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientFrame {
    pub state: IndexMap<String, Value>,
    pub locals: IndexMap<String, Value>,
    pub route: Option<RouteContext>,
    pub imports: Option<Imports>,
    pub styles: Option<StyleTable>,
}

impl ClientFrame {
    /// Run `f` against a context built from this frame. No refs are mounted.
    fn run<T>(&self, f: impl FnOnce(&EvalContext<'_>) -> EvalResult<T>) -> EvalResult<T> {
        let env = ClientEnvironment::default();
        let mut ctx = EvalContext::new(&self.state, &env)
            .with_locals(self.locals.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Locals>());
        if let Some(route) = &self.route {
            ctx = ctx.with_route(route);
        }
        if let Some(imports) = &self.imports {
            ctx = ctx.with_imports(imports);
        }
        if let Some(styles) = &self.styles {
            ctx = ctx.with_styles(styles);
        }
        f(&ctx)
    }
}

/// JSON envelope returned by the string-based entry points.
#[derive(Serialize)]
struct Outcome {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Outcome {
    fn from_result(result: Result<serde_json::Value, String>) -> String {
        let outcome = match result {
            Ok(value) => Outcome {
                ok: true,
                value: Some(value),
                error: None,
            },
            Err(error) => Outcome {
                ok: false,
                value: None,
                error: Some(error),
            },
        };
        serde_json::to_string(&outcome).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"error":"Serialization error: {}"}}"#, e)
        })
    }
}

fn decode(node_json: &str, context_json: &str) -> Result<(Expr, ClientFrame), String> {
    let node = Expr::from_json(node_json).map_err(|e| e.to_string())?;
    let frame = if context_json.trim().is_empty() {
        ClientFrame::default()
    } else {
        serde_json::from_str(context_json).map_err(|e| format!("invalid context: {e}"))?
    };
    Ok((node, frame))
}

/// Evaluate an expression node.
///
/// Returns a JSON string: `{"ok":true,"value":…}` on success, or
/// `{"ok":false,"error":"…"}` when the input does not decode or an
/// application function fails. `undefined` results come back as `null`.
#[wasm_bindgen]
pub fn evaluate(node_json: &str, context_json: &str) -> String {
    Outcome::from_result(decode(node_json, context_json).and_then(|(node, frame)| {
        frame
            .run(|ctx| ripple_eval::evaluate(&node, ctx))
            .map(|value| value.to_json())
            .map_err(|e| e.to_string())
    }))
}

/// Compose the class string for a `style` node, in the same envelope as
/// [`evaluate`].
#[wasm_bindgen]
pub fn evaluate_style(node_json: &str, context_json: &str) -> String {
    Outcome::from_result(decode(node_json, context_json).and_then(|(node, frame)| {
        frame
            .run(|ctx| ripple_eval::evaluate_style(&node, ctx))
            .map(serde_json::Value::String)
            .map_err(|e| e.to_string())
    }))
}

/// Evaluate an expression node given as a JavaScript object, returning the
/// value as a plain JavaScript value.
#[wasm_bindgen]
pub fn evaluate_value(node: JsValue, context: JsValue) -> Result<JsValue, JsError> {
    let node: Expr = serde_wasm_bindgen::from_value(node)?;
    let frame: ClientFrame = if context.is_undefined() || context.is_null() {
        ClientFrame::default()
    } else {
        serde_wasm_bindgen::from_value(context)?
    };
    let value = frame
        .run(|ctx| ripple_eval::evaluate(&node, ctx))
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Return the sandbox tables as JSON, for other sandboxing call sites.
///
/// ```json
/// { "arrayMethods": ["length", ...], "forbiddenKeys": ["__proto__", ...], ... }
/// ```
#[wasm_bindgen]
pub fn safety_policy() -> String {
    let tables = serde_json::json!({
        "arrayMethods": policy::SAFE_ARRAY_METHODS,
        "stringMethods": policy::SAFE_STRING_METHODS,
        "mathMethods": policy::SAFE_MATH_METHODS,
        "dateStaticMethods": policy::SAFE_DATE_STATIC_METHODS,
        "dateInstanceMethods": policy::SAFE_DATE_INSTANCE_METHODS,
        "forbiddenKeys": policy::FORBIDDEN_KEYS,
    });
    tables.to_string()
}

/// Return the evaluator version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(output: &str) -> serde_json::Value {
        serde_json::from_str(output).unwrap()
    }

    #[test]
    fn evaluates_state_path() {
        let out = evaluate(
            r#"{"expr":"state","name":"user","path":"name"}"#,
            r#"{"state":{"user":{"name":"Ada"}}}"#,
        );
        assert_eq!(parse(&out), serde_json::json!({"ok": true, "value": "Ada"}));
    }

    #[test]
    fn locals_and_route_reach_the_evaluator() {
        let node = r#"{"expr":"concat","items":[
            {"expr":"local","name":"greeting"},
            {"expr":"lit","value":" #"},
            {"expr":"route","name":"id"}
        ]}"#;
        let frame = r#"{"locals":{"greeting":"hi"},"route":{"params":{"id":"7"},"path":"/x/7"}}"#;
        assert_eq!(parse(&evaluate(node, frame))["value"], "hi #7");
    }

    #[test]
    fn undefined_comes_back_as_null() {
        let out = parse(&evaluate(r#"{"expr":"state","name":"missing"}"#, ""));
        assert_eq!(out["ok"], true);
        assert!(out["value"].is_null());
    }

    #[test]
    fn bad_input_is_reported() {
        let out = parse(&evaluate("{not json", "{}"));
        assert_eq!(out["ok"], false);
        assert!(out["error"].as_str().is_some());
        let out = parse(&evaluate(r#"{"expr":"lit","value":1}"#, "[1]"));
        assert!(out["error"].as_str().unwrap().starts_with("invalid context"));
    }

    #[test]
    fn style_envelope() {
        let node = r#"{"expr":"style","name":"button","variants":{"size":{"expr":"lit","value":"lg"}}}"#;
        let frame = r#"{"styles":{"button":{"base":"btn","variants":{"size":{"sm":"text-sm","lg":"text-lg"}}}}}"#;
        assert_eq!(
            parse(&evaluate_style(node, frame)),
            serde_json::json!({"ok": true, "value": "btn text-lg"})
        );
    }

    #[test]
    fn policy_tables_are_exported() {
        let tables = parse(&safety_policy());
        assert_eq!(tables["forbiddenKeys"][0], "__proto__");
        assert!(tables["mathMethods"].as_array().unwrap().iter().any(|m| m == "pow"));
        assert!(!version().is_empty());
    }
}
