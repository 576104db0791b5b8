//! Style evaluator: variant-based CSS class composition.

use indexmap::IndexMap;
use ripple_ir::{Expr, StylePreset, Value};
use tracing::debug;

use crate::context::EvalContext;
use crate::error::EvalResult;
use crate::evaluator::evaluate;

/// Compose the class string for a `style` node. Any other node kind, and a
/// style name with no preset, yields `""`.
pub fn evaluate_style(expr: &Expr, ctx: &EvalContext<'_>) -> EvalResult<String> {
    match expr {
        Expr::Style { name, variants } => compose(name, variants, ctx),
        other => {
            debug!(kind = other.kind(), "evaluate_style called on a non-style node");
            Ok(String::new())
        }
    }
}

pub(crate) fn compose(
    name: &str,
    variants: &IndexMap<String, Expr>,
    ctx: &EvalContext<'_>,
) -> EvalResult<String> {
    let Some(preset) = ctx.styles.and_then(|styles| styles.get(name)) else {
        debug!(style = name, "no style preset");
        return Ok(String::new());
    };

    let mut active = ActiveVariants {
        preset,
        supplied: variants,
        ctx,
        resolved: IndexMap::new(),
    };
    let mut classes = Vec::new();
    push_class(&mut classes, &preset.base);

    for (key, table) in &preset.variants {
        let Some(value) = active.get(key)? else {
            continue;
        };
        if let Some(class) = table.get(&value.to_js_string()) {
            push_class(&mut classes, class);
        }
    }

    for compound in &preset.compound_variants {
        let mut matched = true;
        for (key, expected) in &compound.conditions {
            let hit = active
                .get(key)?
                .is_some_and(|value| value.to_js_string() == expected.to_js_string());
            if !hit {
                matched = false;
                break;
            }
        }
        if matched {
            push_class(&mut classes, &compound.class);
        }
    }

    Ok(classes.join(" "))
}

fn push_class(classes: &mut Vec<String>, class: &str) {
    let class = class.trim();
    if !class.is_empty() {
        classes.push(class.to_string());
    }
}

/// Active variant values, each evaluated at most once.
struct ActiveVariants<'s, 'c, 'a> {
    preset: &'s StylePreset,
    supplied: &'s IndexMap<String, Expr>,
    ctx: &'c EvalContext<'a>,
    resolved: IndexMap<String, Option<Value>>,
}

impl ActiveVariants<'_, '_, '_> {
    /// The supplied value for `key` if non-nullish, else the preset default.
    fn get(&mut self, key: &str) -> EvalResult<Option<Value>> {
        if let Some(value) = self.resolved.get(key) {
            return Ok(value.clone());
        }
        let supplied = match self.supplied.get(key) {
            Some(expr) => Some(evaluate(expr, self.ctx)?).filter(|v| !v.is_nullish()),
            None => None,
        };
        let value = supplied.or_else(|| {
            self.preset
                .default_variants
                .get(key)
                .filter(|v| !v.is_nullish())
                .cloned()
        });
        self.resolved.insert(key.to_string(), value.clone());
        Ok(value)
    }
}
