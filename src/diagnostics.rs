//! Checking a display tree for nodes that could not be shown normally.
//!
//! Reports:
//! - Unresolved references (`E001`)
//! - Malformed schema nodes (`E002`)
//! - Circular references (`W001`)
//!
//! Only references reachable from the root are checked.

use std::collections::HashSet;

use serde::Serialize;

use crate::tree::{DisplayNode, SchemaTree};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// Reference of the offending node (e.g., "order.json#/properties/id")
    pub reference: String,
    pub message: String,
}

/// Result of checking one tree.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub root: String,
    pub nodes_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    /// Returns true if no errors were found.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Whether the check passes; in strict mode warnings fail it too.
    pub fn passes(&self, strict: bool) -> bool {
        self.is_ok() && (!strict || self.warnings == 0)
    }
}

/// Walk `tree` and collect a diagnostic for every inline failure node.
///
/// The same problem reached along several paths is reported once.
pub fn check(tree: &SchemaTree<'_>) -> CheckResult {
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();
    let mut nodes_checked = 0;

    for section in &tree.sections {
        check_node(section, &mut nodes_checked, &mut seen, &mut diagnostics);
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    CheckResult {
        root: tree.root.clone(),
        nodes_checked,
        errors,
        warnings,
        diagnostics,
    }
}

fn check_node(
    node: &DisplayNode<'_>,
    nodes_checked: &mut usize,
    seen: &mut HashSet<(&'static str, String)>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    *nodes_checked += 1;

    let found = match node {
        DisplayNode::Unknown { reference } => Some((
            Severity::Error,
            "E001",
            reference,
            format!("unknown schema reference: {}", reference),
        )),
        DisplayNode::Malformed {
            reference, message, ..
        } => Some((Severity::Error, "E002", reference, message.clone())),
        DisplayNode::Cycle { reference, .. } => Some((
            Severity::Warning,
            "W001",
            reference,
            format!("circular reference to {}", reference),
        )),
        _ => None,
    };

    if let Some((severity, code, reference, message)) = found {
        if seen.insert((code, reference.clone())) {
            diagnostics.push(Diagnostic {
                severity,
                code: code.to_string(),
                reference: reference.clone(),
                message,
            });
        }
    }

    for child in node.children() {
        check_node(child, nodes_checked, seen, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::tree::build_tree;
    use serde_json::json;

    #[test]
    fn clean_tree_passes() {
        let registry = SchemaRegistry::new(vec![json!({
            "properties": { "a": { "type": "string" }, "b": { "type": "number" } }
        })])
        .unwrap();
        let result = check(&build_tree(&registry, "schema.json"));
        assert!(result.passes(true));
        assert_eq!(result.nodes_checked, 2);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn reports_unknown_and_malformed() {
        let registry = SchemaRegistry::new(vec![json!({
            "properties": {
                "a": { "$ref": "other.json#" },
                "b": { "type": "array" }
            }
        })])
        .unwrap();
        let result = check(&build_tree(&registry, "schema.json"));
        assert_eq!(result.errors, 2);
        assert!(!result.is_ok());

        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["E001", "E002"]);
        assert_eq!(result.diagnostics[0].reference, "other.json#");
        assert_eq!(result.diagnostics[1].reference, "schema.json#/properties/b");
    }

    #[test]
    fn cycles_are_warnings() {
        let registry = SchemaRegistry::new(vec![json!({
            "$id": "node.json",
            "properties": { "next": { "$ref": "#" } }
        })])
        .unwrap();
        let result = check(&build_tree(&registry, "node.json"));
        assert!(result.is_ok());
        assert!(result.passes(false));
        assert!(!result.passes(true));
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].code, "W001");
    }

    #[test]
    fn duplicates_are_reported_once() {
        let registry = SchemaRegistry::new(vec![json!({
            "properties": {
                "a": { "$ref": "gone.json#" },
                "b": { "$ref": "gone.json#" }
            }
        })])
        .unwrap();
        let result = check(&build_tree(&registry, "schema.json"));
        assert_eq!(result.errors, 1);
    }
}
