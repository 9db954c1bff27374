//! Opening a view: choosing the root document for a set of inputs.

use serde_json::Value;

use crate::error::RegistryError;
use crate::registry::{document_id, SchemaRegistry};
use crate::tree::{build_tree, SchemaTree};
use crate::types::{Dialect, DEFAULT_SCHEMA_ID};

/// Options for opening a view.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// Dialect the input was authored in.
    pub dialect: Dialect,
    /// Identifier of the root document when several are given.
    /// Defaults to the first document's identifier.
    pub root: Option<String>,
}

impl ViewOptions {
    /// Options for plain JSON Schema input with the default root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }
}

/// A registry together with the document the tree starts from.
#[derive(Debug, Clone)]
pub struct SchemaView {
    registry: SchemaRegistry,
    root: String,
}

impl SchemaView {
    /// Register `documents` and pick the root document.
    ///
    /// A joi schema arrives here already converted to JSON Schema. It must be
    /// the only document and is always registered as `schema.json`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AdapterConflict` for a joi schema given with
    /// other documents, any registry construction error, and
    /// `RegistryError::RootNotFound` if the chosen root is not registered.
    pub fn open(mut documents: Vec<Value>, options: &ViewOptions) -> Result<Self, RegistryError> {
        let root = match options.dialect {
            Dialect::Joi => {
                if documents.len() > 1 {
                    return Err(RegistryError::AdapterConflict);
                }
                if let Some(Value::Object(map)) = documents.first_mut() {
                    map.remove("id");
                    map.insert("$id".to_string(), Value::from(DEFAULT_SCHEMA_ID));
                }
                DEFAULT_SCHEMA_ID.to_string()
            }
            Dialect::Json => match &options.root {
                Some(root) => root.clone(),
                None => documents
                    .first()
                    .and_then(document_id)
                    .unwrap_or(DEFAULT_SCHEMA_ID)
                    .to_string(),
            },
        };

        let registry = SchemaRegistry::new(documents)?;
        if !registry.contains(&root) {
            return Err(RegistryError::RootNotFound { id: root });
        }

        tracing::debug!(root = %root, documents = registry.len(), "opened schema view");
        Ok(Self { registry, root })
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Identifier of the root document.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Build a fresh display tree from the root document.
    pub fn tree(&self) -> SchemaTree<'_> {
        build_tree(&self.registry, &self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_document_uses_its_id() {
        let view = SchemaView::open(
            vec![json!({ "$id": "order.json#", "type": "object" })],
            &ViewOptions::new(),
        )
        .unwrap();
        assert_eq!(view.root(), "order.json#");
        assert_eq!(view.tree().root, "order.json");
    }

    #[test]
    fn single_document_without_id_defaults() {
        let view =
            SchemaView::open(vec![json!({ "type": "string" })], &ViewOptions::new()).unwrap();
        assert_eq!(view.root(), "schema.json");
    }

    #[test]
    fn several_documents_default_to_first() {
        let view = SchemaView::open(
            vec![json!({ "$id": "a.json" }), json!({ "$id": "b.json" })],
            &ViewOptions::new(),
        )
        .unwrap();
        assert_eq!(view.root(), "a.json");
    }

    #[test]
    fn explicit_root() {
        let view = SchemaView::open(
            vec![json!({ "$id": "a.json" }), json!({ "$id": "b.json" })],
            &ViewOptions::new().root("b.json"),
        )
        .unwrap();
        assert_eq!(view.root(), "b.json");
    }

    #[test]
    fn unknown_root_errors() {
        let result = SchemaView::open(
            vec![json!({ "$id": "a.json" })],
            &ViewOptions::new().root("missing.json"),
        );
        assert!(matches!(
            result,
            Err(RegistryError::RootNotFound { id }) if id == "missing.json"
        ));
    }

    #[test]
    fn joi_with_several_documents_conflicts() {
        let result = SchemaView::open(
            vec![json!({ "$id": "a.json" }), json!({ "$id": "b.json" })],
            &ViewOptions::new().dialect(Dialect::Joi),
        );
        assert!(matches!(result, Err(RegistryError::AdapterConflict)));
    }

    #[test]
    fn joi_document_is_registered_as_default() {
        let view = SchemaView::open(
            vec![json!({ "$id": "converted.json", "type": "object" })],
            &ViewOptions::new().dialect(Dialect::Joi),
        )
        .unwrap();
        assert_eq!(view.root(), "schema.json");
        assert!(view.registry().contains("schema.json"));
        assert!(!view.registry().contains("converted.json"));
    }

    #[test]
    fn no_documents_has_no_root() {
        let result = SchemaView::open(vec![], &ViewOptions::new());
        assert!(matches!(result, Err(RegistryError::RootNotFound { .. })));
    }
}
