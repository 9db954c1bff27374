//! Classification of a schema node before it is turned into display rows.
//!
//! Priority: combinator, then `$ref`, then object, then array, then leaf.
//! Classification only looks at which keywords are declared; whether the
//! keyword's value has the right form is checked by the tree builder.

use serde_json::Value;

use crate::types::Combinator;

/// How a schema node will be displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaShape<'a> {
    /// `anyOf`, `allOf` or `oneOf`; holds the keyword's value.
    Combination {
        combinator: Combinator,
        alternatives: &'a Value,
    },
    /// `$ref`; holds the keyword's value.
    Reference(&'a Value),
    Object,
    Array,
    Leaf,
}

impl SchemaShape<'_> {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaShape::Combination { combinator, .. } => combinator.keyword(),
            SchemaShape::Reference(_) => "$ref",
            SchemaShape::Object => "object",
            SchemaShape::Array => "array",
            SchemaShape::Leaf => "leaf",
        }
    }
}

/// Classify `schema`. The first matching rule wins.
pub fn classify(schema: &Value) -> SchemaShape<'_> {
    for combinator in Combinator::ALL {
        if let Some(alternatives) = declared(schema, combinator.keyword()) {
            return SchemaShape::Combination {
                combinator,
                alternatives,
            };
        }
    }

    // an empty `$ref` is treated as absent
    if let Some(target) = declared(schema, "$ref").filter(|t| t.as_str() != Some("")) {
        return SchemaShape::Reference(target);
    }

    match schema.get("type") {
        Some(Value::String(t)) if t == "object" => SchemaShape::Object,
        Some(Value::String(t)) if t == "array" => SchemaShape::Array,
        None if declared(schema, "properties").is_some() => SchemaShape::Object,
        None if declared(schema, "items").is_some() => SchemaShape::Array,
        _ => SchemaShape::Leaf,
    }
}

/// Value of `keyword` unless it is absent, `null` or `false`.
pub(crate) fn declared<'a>(schema: &'a Value, keyword: &str) -> Option<&'a Value> {
    schema
        .get(keyword)
        .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn combinators_take_priority() {
        let schema = json!({
            "type": "object",
            "$ref": "other.json#",
            "oneOf": [{ "type": "string" }],
            "anyOf": [{ "type": "number" }]
        });
        assert!(matches!(
            classify(&schema),
            SchemaShape::Combination {
                combinator: Combinator::AnyOf,
                ..
            }
        ));
    }

    #[test]
    fn all_of_before_one_of() {
        let schema = json!({ "oneOf": [], "allOf": [] });
        assert_eq!(classify(&schema).name(), "allOf");
    }

    #[test]
    fn ref_before_type() {
        let schema = json!({ "type": "array", "$ref": "#/definitions/x" });
        assert_eq!(
            classify(&schema),
            SchemaShape::Reference(&json!("#/definitions/x"))
        );
    }

    #[test]
    fn empty_ref_falls_through() {
        let schema = json!({ "$ref": "", "type": "string" });
        assert_eq!(classify(&schema), SchemaShape::Leaf);
    }

    #[test]
    fn object_by_type_or_properties() {
        assert_eq!(classify(&json!({ "type": "object" })), SchemaShape::Object);
        assert_eq!(classify(&json!({ "properties": {} })), SchemaShape::Object);
    }

    #[test]
    fn array_by_type_or_items() {
        assert_eq!(classify(&json!({ "type": "array" })), SchemaShape::Array);
        assert_eq!(classify(&json!({ "items": {} })), SchemaShape::Array);
    }

    #[test]
    fn explicit_type_wins_over_structure() {
        let schema = json!({ "type": "string", "properties": { "a": {} } });
        assert_eq!(classify(&schema), SchemaShape::Leaf);

        // a type list is not "absent"
        let schema = json!({ "type": ["object", "null"], "properties": {} });
        assert_eq!(classify(&schema), SchemaShape::Leaf);
    }

    #[test]
    fn properties_before_items_when_untyped() {
        let schema = json!({ "properties": {}, "items": {} });
        assert_eq!(classify(&schema), SchemaShape::Object);
    }

    #[test]
    fn leaves() {
        assert_eq!(classify(&json!({ "type": "string" })), SchemaShape::Leaf);
        assert_eq!(classify(&json!({})), SchemaShape::Leaf);
        assert_eq!(classify(&json!(true)), SchemaShape::Leaf);
        assert_eq!(classify(&json!({ "anyOf": null })), SchemaShape::Leaf);
    }
}
