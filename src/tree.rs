//! Display tree construction.
//!
//! Walks a schema graph from a starting reference and produces an acyclic
//! tree of display nodes. Failures of a single node (unknown reference,
//! cycle, malformed keyword) become inline nodes; they never abort the build.

use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::NodeError;
use crate::pointer::{child_reference, join_reference, normalize_identifier, visit_key};
use crate::registry::SchemaRegistry;
use crate::shape::{classify, declared, SchemaShape};
use crate::types::{json_type_name, Combinator, RequiredContext};

/// Display name given to the target of a `$ref`.
pub const REFERENCE_NAME: &str = "Reference";

/// Display name given to a schema-valued `additionalProperties`.
pub const ADDITIONAL_PROPERTIES_NAME: &str = "additionalProperties";

/// Keywords left out when a container node's schema is serialized; their
/// content is already represented by the node's children.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "properties",
    "items",
    "additionalProperties",
    "anyOf",
    "allOf",
    "oneOf",
    "$ref",
    "required",
    "definitions",
    "$defs",
];

/// Informational row that stands for no schema of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// `additionalProperties: true` next to declared properties.
    AdditionalPropertiesPermitted,
    /// An object that constrains nothing about its members.
    AcceptsAnything,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AdditionalPropertiesPermitted => "Additional properties are permitted...",
            Notice::AcceptsAnything => "Anything",
        }
    }
}

/// One node of a display tree.
///
/// Schemas are borrowed from the registry the tree was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayNode<'a> {
    /// Dangling reference.
    Unknown { reference: String },

    /// Reference back to a node already on the current path.
    Cycle {
        reference: String,
        name: Option<&'a str>,
    },

    /// Node whose shape keyword has the wrong form.
    Malformed {
        reference: String,
        name: Option<&'a str>,
        message: String,
    },

    Combination {
        name: Option<&'a str>,
        combinator: Combinator,
        #[serde(serialize_with = "serialize_summary")]
        schema: &'a Value,
        children: Vec<DisplayNode<'a>>,
    },

    /// An object. Unnamed objects are shown as their properties alone.
    Object {
        name: Option<&'a str>,
        required: bool,
        #[serde(serialize_with = "serialize_summary")]
        schema: &'a Value,
        properties: Vec<DisplayNode<'a>>,
        allows_additional: bool,
    },

    Array {
        name: Option<&'a str>,
        required: bool,
        #[serde(serialize_with = "serialize_summary")]
        schema: &'a Value,
        items: Box<DisplayNode<'a>>,
    },

    Leaf {
        name: Option<&'a str>,
        required: bool,
        schema: &'a Value,
    },

    Notice { notice: Notice },
}

impl<'a> DisplayNode<'a> {
    /// Inline node standing in for a failed build.
    pub fn from_error(error: NodeError, name: Option<&'a str>) -> Self {
        match error {
            NodeError::UnresolvedReference { reference } => DisplayNode::Unknown { reference },
            NodeError::CyclicReference { reference } => DisplayNode::Cycle { reference, name },
            NodeError::MalformedSchema { reference, message } => DisplayNode::Malformed {
                reference,
                name,
                message,
            },
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        match self {
            DisplayNode::Cycle { name, .. }
            | DisplayNode::Malformed { name, .. }
            | DisplayNode::Combination { name, .. }
            | DisplayNode::Object { name, .. }
            | DisplayNode::Array { name, .. }
            | DisplayNode::Leaf { name, .. } => *name,
            DisplayNode::Unknown { .. } | DisplayNode::Notice { .. } => None,
        }
    }

    /// Whether the enclosing object lists this node as required.
    pub fn is_required(&self) -> bool {
        match self {
            DisplayNode::Object { required, .. }
            | DisplayNode::Array { required, .. }
            | DisplayNode::Leaf { required, .. } => *required,
            _ => false,
        }
    }

    /// The schema this node was built from, if it resolved.
    pub fn schema(&self) -> Option<&'a Value> {
        match self {
            DisplayNode::Combination { schema, .. }
            | DisplayNode::Object { schema, .. }
            | DisplayNode::Array { schema, .. }
            | DisplayNode::Leaf { schema, .. } => Some(*schema),
            _ => None,
        }
    }

    /// Direct children, in display order.
    pub fn children(&self) -> &[DisplayNode<'a>] {
        match self {
            DisplayNode::Combination { children, .. } => children.as_slice(),
            DisplayNode::Object { properties, .. } => properties.as_slice(),
            DisplayNode::Array { items, .. } => std::slice::from_ref(items.as_ref()),
            _ => &[],
        }
    }

    /// Top-level sections for this node: an unnamed object contributes its
    /// properties directly, anything else is a single section.
    pub fn into_sections(self) -> Vec<DisplayNode<'a>> {
        match self {
            DisplayNode::Object {
                name: None,
                properties,
                ..
            } => properties,
            other => vec![other],
        }
    }
}

/// Display tree for one root document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaTree<'a> {
    /// Identifier of the root document.
    pub root: String,
    pub sections: Vec<DisplayNode<'a>>,
}

/// Build the display tree of the document registered as `root_id`.
///
/// The root is built without a name and without inherited required names.
/// An unknown root yields a single `Unknown` section.
pub fn build_tree<'a>(registry: &'a SchemaRegistry, root_id: &str) -> SchemaTree<'a> {
    let root = normalize_identifier(root_id);
    let reference = format!("{}#", root);
    let node = build(registry, &reference, None, RequiredContext::none());
    SchemaTree {
        root: root.to_string(),
        sections: node.into_sections(),
    }
}

/// Build the display node for `reference`.
///
/// `inherited` holds the required names of the enclosing object; the node is
/// marked required when `name` is one of them.
pub fn build<'a>(
    registry: &'a SchemaRegistry,
    reference: &str,
    name: Option<&'a str>,
    inherited: RequiredContext<'a>,
) -> DisplayNode<'a> {
    TreeBuilder::new(registry).build(reference, name, inherited)
}

/// Recursive builder. Tracks the nodes on the current path to stop at cycles.
struct TreeBuilder<'a> {
    registry: &'a SchemaRegistry,
    visiting: HashSet<(String, String)>,
}

impl<'a> TreeBuilder<'a> {
    fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            visiting: HashSet::new(),
        }
    }

    fn build(
        &mut self,
        reference: &str,
        name: Option<&'a str>,
        inherited: RequiredContext<'a>,
    ) -> DisplayNode<'a> {
        let key = visit_key(reference);
        if self.visiting.contains(&key) {
            tracing::warn!(reference, "circular schema reference");
            return DisplayNode::from_error(
                NodeError::CyclicReference {
                    reference: reference.to_string(),
                },
                name,
            );
        }

        self.visiting.insert(key.clone());
        let node = self
            .build_node(reference, name, inherited)
            .unwrap_or_else(|error| {
                tracing::warn!(reference, %error, "schema node rendered inline");
                DisplayNode::from_error(error, name)
            });
        self.visiting.remove(&key);

        node
    }

    fn build_node(
        &mut self,
        reference: &str,
        name: Option<&'a str>,
        inherited: RequiredContext<'a>,
    ) -> Result<DisplayNode<'a>, NodeError> {
        let registry = self.registry;
        let schema = registry
            .resolve(reference)
            .ok_or_else(|| NodeError::UnresolvedReference {
                reference: reference.to_string(),
            })?;

        let own = RequiredContext::for_schema(schema, inherited);
        let required = name.is_some_and(|n| inherited.contains(n));

        let shape = classify(schema);
        tracing::trace!(reference, shape = shape.name(), "building schema node");

        match shape {
            SchemaShape::Combination {
                combinator,
                alternatives,
            } => self.combination(reference, name, schema, combinator, alternatives),
            SchemaShape::Reference(target) => {
                let target = target
                    .as_str()
                    .ok_or_else(|| malformed(reference, wrong_type("$ref", "a string", target)))?;
                let target = join_reference(reference, target);
                Ok(self.build(&target, Some(REFERENCE_NAME), RequiredContext::none()))
            }
            SchemaShape::Object => self.object(reference, name, schema, required, own),
            SchemaShape::Array => self.array(reference, name, schema, required, own),
            SchemaShape::Leaf => Ok(DisplayNode::Leaf {
                name,
                required,
                schema,
            }),
        }
    }

    fn combination(
        &mut self,
        reference: &str,
        name: Option<&'a str>,
        schema: &'a Value,
        combinator: Combinator,
        alternatives: &'a Value,
    ) -> Result<DisplayNode<'a>, NodeError> {
        let alternatives = alternatives.as_array().ok_or_else(|| {
            malformed(
                reference,
                wrong_type(combinator.keyword(), "an array", alternatives),
            )
        })?;

        // Branches start without required names: being in a branch says
        // nothing about the parent's required list.
        let base = child_reference(reference, combinator.keyword());
        let children = alternatives
            .iter()
            .enumerate()
            .map(|(i, alternative)| {
                let title = alternative.get("title").and_then(Value::as_str);
                let child = child_reference(&base, &i.to_string());
                self.build(&child, title, RequiredContext::none())
            })
            .collect();

        Ok(DisplayNode::Combination {
            name,
            combinator,
            schema,
            children,
        })
    }

    fn object(
        &mut self,
        reference: &str,
        name: Option<&'a str>,
        schema: &'a Value,
        required: bool,
        own: RequiredContext<'a>,
    ) -> Result<DisplayNode<'a>, NodeError> {
        let additional = schema.get("additionalProperties");
        let allows_additional = matches!(additional, Some(Value::Bool(true) | Value::Object(_)));

        let mut children = Vec::new();
        if let Some(properties) = declared(schema, "properties") {
            let properties = properties.as_object().ok_or_else(|| {
                malformed(reference, wrong_type("properties", "an object", properties))
            })?;

            let base = child_reference(reference, "properties");
            for prop_name in properties.keys() {
                let child = child_reference(&base, prop_name);
                children.push(self.build(&child, Some(prop_name.as_str()), own));
            }

            if let Some(Value::Bool(true)) = additional {
                children.push(DisplayNode::Notice {
                    notice: Notice::AdditionalPropertiesPermitted,
                });
            }
        } else if let Some(Value::Object(_)) = additional {
            let child = child_reference(reference, "additionalProperties");
            children.push(self.build(&child, Some(ADDITIONAL_PROPERTIES_NAME), own));
        } else {
            children.push(DisplayNode::Notice {
                notice: Notice::AcceptsAnything,
            });
        }

        Ok(DisplayNode::Object {
            name,
            required,
            schema,
            properties: children,
            allows_additional,
        })
    }

    fn array(
        &mut self,
        reference: &str,
        name: Option<&'a str>,
        schema: &'a Value,
        required: bool,
        own: RequiredContext<'a>,
    ) -> Result<DisplayNode<'a>, NodeError> {
        let items = schema
            .get("items")
            .filter(|items| !items.is_null())
            .ok_or_else(|| malformed(reference, "array schema has no items".to_string()))?;

        let title = items.get("title").and_then(Value::as_str);
        let child = child_reference(reference, "items");
        let items = self.build(&child, title, own);

        Ok(DisplayNode::Array {
            name,
            required,
            schema,
            items: Box::new(items),
        })
    }
}

fn malformed(reference: &str, message: String) -> NodeError {
    NodeError::MalformedSchema {
        reference: reference.to_string(),
        message,
    }
}

fn wrong_type(keyword: &str, expected: &str, actual: &Value) -> String {
    format!(
        "{} must be {}, got {}",
        keyword,
        expected,
        json_type_name(actual)
    )
}

fn serialize_summary<S: Serializer>(schema: &&Value, serializer: S) -> Result<S::Ok, S::Error> {
    match schema {
        Value::Object(map) => {
            let mut out = serializer.serialize_map(None)?;
            for (key, value) in map {
                if !STRUCTURAL_KEYWORDS.contains(&key.as_str()) {
                    out.serialize_entry(key, value)?;
                }
            }
            out.end()
        }
        other => other.serialize(serializer),
    }
}
