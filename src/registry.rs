//! Registry of schema documents indexed by identifier.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::RegistryError;
use crate::pointer::{navigate, normalize_identifier, split_reference};
use crate::types::DEFAULT_SCHEMA_ID;

/// Immutable collection of schema documents keyed by normalized identifier.
///
/// Built once per view and discarded with it.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Value>,
    /// Identifiers in registration order.
    order: Vec<String>,
}

impl SchemaRegistry {
    /// Index `documents` by their `$id` (or draft-04 `id`).
    ///
    /// A single document without an identifier is registered as
    /// `schema.json`. Trailing `#` and `#/` are stripped from identifiers.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::MissingIdentifier` when a document (other than
    /// a lone one) has no identifier, and `RegistryError::DuplicateIdentifier`
    /// when two documents normalize to the same identifier.
    pub fn new(documents: Vec<Value>) -> Result<Self, RegistryError> {
        let mut documents = documents;

        if let [only] = documents.as_mut_slice() {
            if document_id(only).is_none() {
                if let Value::Object(map) = only {
                    map.insert("$id".to_string(), Value::from(DEFAULT_SCHEMA_ID));
                }
            }
        }

        let mut registry = Self::default();
        for (index, document) in documents.into_iter().enumerate() {
            let id = document_id(&document)
                .map(|id| normalize_identifier(id).to_string())
                .filter(|id| !id.is_empty())
                .ok_or(RegistryError::MissingIdentifier { index })?;

            if registry.schemas.contains_key(&id) {
                return Err(RegistryError::DuplicateIdentifier { id });
            }

            tracing::debug!(id = %id, "registered schema document");
            registry.order.push(id.clone());
            registry.schemas.insert(id, document);
        }

        Ok(registry)
    }

    /// Resolve an `identifier#fragment` reference to a schema node.
    ///
    /// Returns `None` for an unknown identifier or a fragment that leaves
    /// the document.
    pub fn resolve(&self, reference: &str) -> Option<&Value> {
        let (id, fragment) = split_reference(reference);
        let document = self.schemas.get(id)?;
        navigate(document, fragment)
    }

    /// The whole document registered under `id`.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.schemas.get(normalize_identifier(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Registered identifiers, in the order the documents were given.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// The identifier a document declares: `$id`, else `id`, if a non-empty string.
pub fn document_id(document: &Value) -> Option<&str> {
    ["$id", "id"]
        .iter()
        .filter_map(|key| document.get(*key).and_then(Value::as_str))
        .find(|id| !id.is_empty())
}
