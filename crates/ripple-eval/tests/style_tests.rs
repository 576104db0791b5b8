//! Integration tests for style composition.

use std::collections::HashMap;

use ripple_eval::ripple_ir::{Expr, StylePreset, Value};
use ripple_eval::{evaluate, evaluate_style, EvalContext, Locals, ServerEnvironment, StyleTable};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn styles(json: &str) -> StyleTable {
    StylePreset::table_from_json(json).unwrap()
}

fn parse(json: &str) -> Expr {
    Expr::from_json(json).unwrap()
}

fn compose(table: &StyleTable, node: &Expr) -> String {
    compose_with(table, node, Locals::new())
}

fn compose_with(table: &StyleTable, node: &Expr, locals: Locals) -> String {
    let state: HashMap<String, Value> = HashMap::new();
    let env = ServerEnvironment::default();
    let ctx = EvalContext::new(&state, &env)
        .with_styles(table)
        .with_locals(locals);
    evaluate_style(node, &ctx).unwrap()
}

const BUTTON: &str = r#"{
    "button": {
        "base": "btn",
        "variants": {
            "size": { "sm": "text-sm", "md": "text-md", "lg": "text-lg" },
            "tone": { "neutral": "", "danger": "bg-red", "ghost": "  bg-none  " }
        },
        "defaultVariants": { "size": "md" },
        "compoundVariants": [
            { "size": "lg", "tone": "danger", "class": "ring-2" },
            { "class": "focus-visible" }
        ]
    }
}"#;

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn explicit_variant_picks_its_class() {
    let table = styles(r#"{"button":{"base":"btn","variants":{"size":{"sm":"text-sm","md":"text-md","lg":"text-lg"}}}}"#);
    let node = parse(r#"{"expr":"style","name":"button","variants":{"size":{"expr":"lit","value":"lg"}}}"#);
    assert_eq!(compose(&table, &node), "btn text-lg");
}

#[test]
fn preset_without_variants_is_trimmed_base() {
    let table = styles(r#"{"card":{"base":"  card shadow  "}}"#);
    let node = parse(r#"{"expr":"style","name":"card"}"#);
    assert_eq!(compose(&table, &node), "card shadow");
}

#[test]
fn unknown_preset_is_empty() {
    let node = parse(r#"{"expr":"style","name":"nope"}"#);
    assert_eq!(compose(&styles(BUTTON), &node), "");
}

#[test]
fn defaults_apply_when_variant_is_omitted_or_nullish() {
    let table = styles(BUTTON);
    let omitted = parse(r#"{"expr":"style","name":"button"}"#);
    let explicit = parse(r#"{"expr":"style","name":"button","variants":{"size":{"expr":"lit","value":"md"}}}"#);
    let null = parse(r#"{"expr":"style","name":"button","variants":{"size":{"expr":"lit","value":null}}}"#);

    assert_eq!(compose(&table, &omitted), "btn text-md focus-visible");
    assert_eq!(compose(&table, &omitted), compose(&table, &explicit));
    assert_eq!(compose(&table, &null), compose(&table, &explicit));
}

#[test]
fn unmatched_and_empty_classes_are_skipped() {
    let table = styles(BUTTON);
    let node = parse(
        r#"{"expr":"style","name":"button","variants":{
            "size":{"expr":"lit","value":"xl"},
            "tone":{"expr":"lit","value":"neutral"}
        }}"#,
    );
    assert_eq!(compose(&table, &node), "btn focus-visible");
}

#[test]
fn variant_classes_are_trimmed() {
    let node = parse(r#"{"expr":"style","name":"button","variants":{"tone":{"expr":"lit","value":"ghost"}}}"#);
    assert_eq!(compose(&styles(BUTTON), &node), "btn text-md bg-none focus-visible");
}

#[test]
fn compound_variants_need_every_condition() {
    let table = styles(BUTTON);
    let both = parse(
        r#"{"expr":"style","name":"button","variants":{
            "tone":{"expr":"local","name":"tone"},
            "size":{"expr":"lit","value":"lg"}
        }}"#,
    );
    let danger: Locals = [("tone", Value::from("danger"))].into_iter().collect();
    assert_eq!(
        compose_with(&table, &both, danger),
        "btn text-lg bg-red ring-2 focus-visible"
    );
    let ghost: Locals = [("tone", Value::from("ghost"))].into_iter().collect();
    assert_eq!(
        compose_with(&table, &both, ghost),
        "btn text-lg bg-none focus-visible"
    );
}

#[test]
fn variant_values_are_stringified() {
    let table = styles(r#"{"grid":{"base":"grid","variants":{"cols":{"2":"cols-2","3":"cols-3"},"dense":{"true":"gap-1"}}}}"#);
    let node = parse(
        r#"{"expr":"style","name":"grid","variants":{
            "cols":{"expr":"lit","value":3},
            "dense":{"expr":"lit","value":true}
        }}"#,
    );
    assert_eq!(compose(&table, &node), "grid cols-3 gap-1");
}

#[test]
fn style_nodes_evaluate_to_strings() {
    let table = styles(BUTTON);
    let node = parse(r#"{"expr":"style","name":"button","variants":{"size":{"expr":"lit","value":"sm"}}}"#);
    let state: HashMap<String, Value> = HashMap::new();
    let env = ServerEnvironment::default();
    let ctx = EvalContext::new(&state, &env).with_styles(&table);
    assert_eq!(
        evaluate(&node, &ctx).unwrap(),
        Value::from("btn text-sm focus-visible")
    );
}

#[test]
fn non_style_node_is_empty() {
    assert_eq!(compose(&styles(BUTTON), &Expr::lit("btn")), "");
}

#[test]
fn without_style_table_everything_is_empty() {
    let state: HashMap<String, Value> = HashMap::new();
    let env = ServerEnvironment::default();
    let ctx = EvalContext::new(&state, &env);
    let node = parse(r#"{"expr":"style","name":"button"}"#);
    assert_eq!(evaluate_style(&node, &ctx).unwrap(), "");
}
