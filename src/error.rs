//! Error types for schema loading, registry construction and tree building.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while assembling the schema registry or choosing the root document.
///
/// These are construction-time failures and abort the whole view.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("schema document at position {index} has no $id")]
    MissingIdentifier { index: usize },

    #[error("duplicate schema identifier \"{id}\"")]
    DuplicateIdentifier { id: String },

    #[error("a joi schema cannot be combined with a list of schema documents")]
    AdapterConflict,

    #[error("no schema with $id {id}")]
    RootNotFound { id: String },
}

impl RegistryError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors while opening a view over a set of documents.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ViewError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ViewError::Load(e) => e.exit_code(),
            ViewError::Registry(e) => e.exit_code(),
        }
    }
}

/// Failure of a single node while building a display tree.
///
/// Never returned from the public builder: each one is turned into an
/// inline node so sibling branches still render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("unknown schema reference {reference}")]
    UnresolvedReference { reference: String },

    #[error("circular schema reference {reference}")]
    CyclicReference { reference: String },

    #[error("malformed schema at {reference}: {message}")]
    MalformedSchema { reference: String, message: String },
}
