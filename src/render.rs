//! Rendering display trees as text tables or JSON.

use serde_json::Value;

use crate::tree::{DisplayNode, SchemaTree};
use crate::types::OutputFormat;

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include the description column.
    pub descriptions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { descriptions: true }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptions(mut self, descriptions: bool) -> Self {
        self.descriptions = descriptions;
        self
    }
}

/// Render a tree in the requested format.
///
/// # Errors
///
/// Returns the serializer error if JSON output fails.
pub fn render(
    tree: &SchemaTree<'_>,
    format: OutputFormat,
    options: &RenderOptions,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(tree, options)),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(tree),
        OutputFormat::Json => serde_json::to_string(tree),
    }
}

/// Render a tree as a column-aligned table.
///
/// Nesting is shown by indenting the name column two spaces per level.
pub fn render_text(tree: &SchemaTree<'_>, options: &RenderOptions) -> String {
    let mut lines = Vec::new();
    for section in &tree.sections {
        collect_lines(section, 0, &mut lines);
    }

    let header = Line::Row(Row {
        depth: 0,
        name: "Name".to_string(),
        label: "Type".to_string(),
        required: "Required".to_string(),
        description: "Description".to_string(),
    });

    let rows = std::iter::once(&header).chain(&lines);
    let name_width = column_width(rows.clone(), |row| row.depth * 2 + row.name.chars().count());
    let label_width = column_width(rows.clone(), |row| row.label.chars().count());
    let required_width = column_width(rows.clone(), |row| row.required.chars().count());

    let mut out = String::new();
    for line in rows {
        let text = match line {
            Line::Row(row) => {
                let name = format!("{}{}", indent(row.depth), row.name);
                let mut text = format!(
                    "{:<nw$}  {:<lw$}  {:<rw$}",
                    name,
                    row.label,
                    row.required,
                    nw = name_width,
                    lw = label_width,
                    rw = required_width,
                );
                if options.descriptions {
                    text.push_str("  ");
                    text.push_str(&row.description);
                }
                text
            }
            Line::Message { depth, text } => format!("{}{}", indent(*depth), text),
        };
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out
}

/// Type column for a leaf: its `type` (lists joined by `|`) with any `format`.
pub fn type_label(schema: &Value) -> String {
    let base = match schema.get("type") {
        Some(Value::String(t)) => t.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" | "),
        _ if schema.get("enum").is_some() => "enum".to_string(),
        _ if schema.get("const").is_some() => "const".to_string(),
        _ => "any".to_string(),
    };

    match schema.get("format").and_then(Value::as_str) {
        Some(format) => format!("{} ({})", base, format),
        None => base,
    }
}

enum Line {
    Row(Row),
    Message { depth: usize, text: String },
}

struct Row {
    depth: usize,
    name: String,
    label: String,
    required: String,
    description: String,
}

fn collect_lines(node: &DisplayNode<'_>, depth: usize, lines: &mut Vec<Line>) {
    match node {
        DisplayNode::Unknown { reference } => lines.push(Line::Message {
            depth,
            text: format!("Unknown schema reference {}", reference),
        }),
        DisplayNode::Notice { notice } => lines.push(Line::Message {
            depth,
            text: notice.message().to_string(),
        }),
        DisplayNode::Cycle { reference, .. } => lines.push(Line::Row(Row {
            description: reference.clone(),
            ..row(node, depth, "Circular reference")
        })),
        DisplayNode::Malformed { message, .. } => lines.push(Line::Row(Row {
            description: message.clone(),
            ..row(node, depth, "Malformed schema")
        })),
        DisplayNode::Leaf { schema, .. } => {
            lines.push(Line::Row(row(node, depth, &type_label(schema))));
        }
        DisplayNode::Object { name: None, .. } => {
            // unnamed objects are shown as their properties alone
            for child in node.children() {
                collect_lines(child, depth, lines);
            }
        }
        DisplayNode::Object { .. }
        | DisplayNode::Array { .. }
        | DisplayNode::Combination { .. } => {
            let label = match node {
                DisplayNode::Combination { combinator, .. } => combinator.label(),
                DisplayNode::Array { .. } => "Array of",
                _ => "Object of",
            };
            lines.push(Line::Row(row(node, depth, label)));
            for child in node.children() {
                collect_lines(child, depth + 1, lines);
            }
        }
    }
}

fn row(node: &DisplayNode<'_>, depth: usize, label: &str) -> Row {
    Row {
        depth,
        name: node.name().unwrap_or_default().to_string(),
        label: label.to_string(),
        required: if node.is_required() { "yes" } else { "" }.to_string(),
        description: node.schema().map(description).unwrap_or_default(),
    }
}

fn column_width<'l>(lines: impl Iterator<Item = &'l Line>, width: impl Fn(&Row) -> usize) -> usize {
    lines
        .filter_map(|line| match line {
            Line::Row(row) => Some(width(row)),
            Line::Message { .. } => None,
        })
        .max()
        .unwrap_or(0)
}

fn description(schema: &Value) -> String {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::tree::build_tree;
    use serde_json::json;

    fn render_doc(doc: Value) -> String {
        let registry = SchemaRegistry::new(vec![doc]).unwrap();
        let tree = build_tree(&registry, "schema.json");
        render_text(&tree, &RenderOptions::new())
    }

    #[test]
    fn type_labels() {
        assert_eq!(type_label(&json!({ "type": "string" })), "string");
        assert_eq!(
            type_label(&json!({ "type": "string", "format": "date-time" })),
            "string (date-time)"
        );
        assert_eq!(
            type_label(&json!({ "type": ["string", "null"] })),
            "string | null"
        );
        assert_eq!(type_label(&json!({ "enum": ["a", "b"] })), "enum");
        assert_eq!(type_label(&json!({})), "any");
        assert_eq!(type_label(&json!(true)), "any");
    }

    #[test]
    fn renders_aligned_rows() {
        let out = render_doc(json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "string", "description": "Primary\n   key" },
                "count": { "type": "integer" }
            }
        }));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].starts_with("id     string   yes"));
        assert!(lines[1].ends_with("Primary key"));
        assert_eq!(lines[2], "count  integer");
    }

    #[test]
    fn nested_rows_are_indented() {
        let out = render_doc(json!({
            "properties": {
                "tags": { "type": "array", "items": { "title": "tag", "type": "string" } }
            }
        }));
        assert!(out.contains("tags   Array of"));
        assert!(out.contains("\n  tag  string"));
    }

    #[test]
    fn messages_span_the_row() {
        let out = render_doc(json!({
            "properties": {
                "meta": { "type": "object" },
                "other": { "$ref": "missing.json#" }
            },
            "additionalProperties": true
        }));
        assert!(out.contains("\n  Anything\n"));
        assert!(out.contains("\nUnknown schema reference missing.json#\n"));
        assert!(out.ends_with("Additional properties are permitted...\n"));
    }

    #[test]
    fn combination_labels() {
        let out = render_doc(json!({
            "anyOf": [
                { "title": "A", "type": "string" },
                { "title": "B", "type": "number" }
            ]
        }));
        assert!(out.contains("Any of"));
        assert!(out.contains("  A"));
        assert!(out.contains("  B"));
    }

    #[test]
    fn descriptions_can_be_hidden() {
        let registry = SchemaRegistry::new(vec![json!({
            "properties": { "id": { "type": "string", "description": "Primary key" } }
        })])
        .unwrap();
        let tree = build_tree(&registry, "schema.json");
        let out = render_text(&tree, &RenderOptions::new().descriptions(false));
        assert!(!out.contains("Primary key"));
        assert!(!out.contains("Description"));
    }

    #[test]
    fn json_output_is_tagged() {
        let registry = SchemaRegistry::new(vec![json!({ "type": "string" })]).unwrap();
        let tree = build_tree(&registry, "schema.json");
        let out = render(&tree, OutputFormat::Json, &RenderOptions::new(), false).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["root"], "schema.json");
        assert_eq!(value["sections"][0]["kind"], "leaf");
    }
}
