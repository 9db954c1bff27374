//! Core types shared by the registry, the tree builder and the renderer.

use serde::Serialize;
use serde_json::Value;

/// Identifier given to a lone document that declares none.
pub const DEFAULT_SCHEMA_ID: &str = "schema.json";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Composition keyword of a combination node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Combinator {
    #[serde(rename = "anyOf")]
    AnyOf,
    #[serde(rename = "allOf")]
    AllOf,
    #[serde(rename = "oneOf")]
    OneOf,
}

impl Combinator {
    /// Keywords in the order they are checked.
    pub const ALL: [Combinator; 3] = [Combinator::AnyOf, Combinator::AllOf, Combinator::OneOf];

    /// Returns the schema keyword for this combinator.
    pub fn keyword(&self) -> &'static str {
        match self {
            Combinator::AnyOf => "anyOf",
            Combinator::AllOf => "allOf",
            Combinator::OneOf => "oneOf",
        }
    }

    /// Returns the row label shown for a combination.
    pub fn label(&self) -> &'static str {
        match self {
            Combinator::AnyOf => "Any of",
            Combinator::AllOf => "All of",
            Combinator::OneOf => "One of",
        }
    }
}

/// Dialect the caller's schema was written in.
///
/// Joi schemas are converted to JSON Schema before they reach this crate;
/// the dialect only changes how the root document is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Json,
    Joi,
}

impl Dialect {
    /// Parse a dialect name.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Dialect::Json),
            "joi" => Some(Dialect::Joi),
            _ => None,
        }
    }
}

/// Output format of a rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Column-aligned text table.
    #[default]
    Text,
    /// The display tree serialized as JSON.
    Json,
}

impl OutputFormat {
    /// Parse an output format name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Property names that are mandatory on the enclosing object.
///
/// Borrowed straight from a schema's `required` array and passed down the
/// recursion by value; nothing ever mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RequiredContext<'a> {
    names: &'a [Value],
}

impl<'a> RequiredContext<'a> {
    /// Context with no required names.
    pub fn none() -> Self {
        Self::default()
    }

    /// Context declared by the schema's own `required` array, if any.
    pub fn declared_by(schema: &'a Value) -> Option<Self> {
        schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| Self { names })
    }

    /// The schema's own `required` array, or `inherited` when it has none.
    pub fn for_schema(schema: &'a Value, inherited: Self) -> Self {
        Self::declared_by(schema).unwrap_or(inherited)
    }

    /// Whether `name` is a required property.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.as_str() == Some(name))
    }
}
