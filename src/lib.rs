//! JSON Schema Viewer
//!
//! Resolves collections of JSON Schema documents and lays them out as a tree
//! of display rows: one row per property, with nested tables for objects,
//! arrays and `anyOf`/`allOf`/`oneOf` compositions.
//!
//! # Example
//!
//! ```
//! use schema_viewer::{build_tree, DisplayNode, SchemaRegistry};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["id"],
//!     "properties": {
//!         "id": { "type": "string" },
//!         "tags": { "type": "array", "items": { "type": "string" } }
//!     }
//! });
//!
//! let registry = SchemaRegistry::new(vec![schema]).unwrap();
//! let tree = build_tree(&registry, "schema.json");
//!
//! // The root object is flattened into one section per property
//! assert_eq!(tree.sections.len(), 2);
//! assert!(matches!(
//!     tree.sections[0],
//!     DisplayNode::Leaf { name: Some("id"), required: true, .. }
//! ));
//! ```
//!
//! # References
//!
//! A reference is `identifier#/json/pointer`. Identifiers come from each
//! document's `$id` (a lone document without one is `schema.json`), and
//! fragments follow RFC 6901 escaping:
//!
//! | Property name | Segment |
//! |---------------|---------|
//! | `a/b` | `a~1b` |
//! | `a~b` | `a~0b` |
//!
//! # Failure handling
//!
//! Only construction errors (missing or duplicate identifiers, a joi schema
//! given with other documents, an unknown root) are returned as `Err`.
//! Unknown references, reference cycles and malformed nodes become inline
//! [`DisplayNode`] variants so the rest of the document still renders.

mod diagnostics;
mod error;
mod loader;
mod pointer;
mod registry;
mod render;
mod shape;
mod tree;
mod types;
mod view;

pub use diagnostics::{check, CheckResult, Diagnostic, Severity};
pub use error::{LoadError, NodeError, RegistryError, ViewError};
pub use loader::{is_url, load_document, load_document_auto, load_document_str, load_documents};
pub use pointer::{
    child_reference, escape_segment, join_reference, navigate, normalize_identifier,
    split_reference, unescape_segment,
};
pub use registry::{document_id, SchemaRegistry};
pub use render::{render, render_text, type_label, RenderOptions};
pub use shape::{classify, SchemaShape};
pub use tree::{
    build, build_tree, DisplayNode, Notice, SchemaTree, ADDITIONAL_PROPERTIES_NAME,
    REFERENCE_NAME,
};
pub use types::{
    json_type_name, Combinator, Dialect, OutputFormat, RequiredContext, DEFAULT_SCHEMA_ID,
};
pub use view::{SchemaView, ViewOptions};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
