//! Style presets: variant-based CSS class composition data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::value::Value;

/// A named bundle of base and variant class strings.
///
/// ```json
/// {
///   "base": "btn",
///   "variants": { "size": { "sm": "text-sm", "lg": "text-lg" } },
///   "defaultVariants": { "size": "sm" },
///   "compoundVariants": [{ "size": "lg", "tone": "danger", "class": "ring" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    #[serde(default)]
    pub base: String,
    /// Variant key → (variant value → class string), in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variants: IndexMap<String, IndexMap<String, String>>,
    /// Variant key → value used when the expression supplies none.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub default_variants: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compound_variants: Vec<CompoundVariant>,
}

/// Extra classes applied when several variants hold specific values at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundVariant {
    /// Variant key → required active value.
    #[serde(flatten)]
    pub conditions: IndexMap<String, Value>,
    pub class: String,
}

impl StylePreset {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Add a variant axis with its value → class table.
    pub fn with_variant<'a>(
        mut self,
        key: impl Into<String>,
        classes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.variants.insert(
            key.into(),
            classes
                .into_iter()
                .map(|(v, c)| (v.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_variants.insert(key.into(), value.into());
        self
    }

    /// Decode a preset table (`name → preset`) from JSON text.
    pub fn table_from_json(source: &str) -> Result<IndexMap<String, StylePreset>, IrError> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_fields() {
        let preset: StylePreset = serde_json::from_str(
            r#"{
                "base": " btn ",
                "variants": { "size": { "sm": "text-sm", "lg": "text-lg" } },
                "defaultVariants": { "size": "sm" },
                "compoundVariants": [{ "size": "lg", "tone": "danger", "class": "ring" }]
            }"#,
        )
        .unwrap();
        assert_eq!(preset.base, " btn ");
        assert_eq!(preset.variants["size"]["lg"], "text-lg");
        assert_eq!(preset.default_variants["size"], Value::from("sm"));
        let compound = &preset.compound_variants[0];
        assert_eq!(compound.class, "ring");
        assert_eq!(compound.conditions.len(), 2);
        assert_eq!(compound.conditions["tone"], Value::from("danger"));
    }

    #[test]
    fn variants_are_optional() {
        let preset: StylePreset = serde_json::from_str(r#"{ "base": "card" }"#).unwrap();
        assert!(preset.variants.is_empty());
        assert!(preset.default_variants.is_empty());
        assert!(preset.compound_variants.is_empty());
    }

    #[test]
    fn variant_order_is_declaration_order() {
        let preset: StylePreset = serde_json::from_str(
            r#"{ "base": "b", "variants": { "z": {}, "a": {}, "m": {} } }"#,
        )
        .unwrap();
        let keys: Vec<_> = preset.variants.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
