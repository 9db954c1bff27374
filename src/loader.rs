//! Schema document loading from various sources.
//!
//! Handles loading documents from files, strings and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a schema document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "loaded schema document");
    load_document_str(&content)
}

/// Load a schema document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a schema document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the
/// response isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let response = client.get(url).send().map_err(network_error)?;

    // Check for HTTP errors before parsing
    let response = response.error_for_status().map_err(network_error)?;

    tracing::debug!(url, "fetched schema document");
    response.json().map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a schema document from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_document_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Load every source in order, stopping at the first failure.
pub fn load_documents<S: AsRef<str>>(sources: &[S]) -> Result<Vec<Value>, LoadError> {
    sources
        .iter()
        .map(|source| load_document_auto(source.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_document_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type": "object"}}"#).unwrap();

        let schema = load_document(file.path()).unwrap();
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn load_document_file_not_found() {
        let result = load_document(Path::new("/nonexistent/path.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_document_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_str_preserves_property_order() {
        let schema =
            load_document_str(r#"{"properties": {"zeta": {}, "alpha": {}, "mid": {}}}"#).unwrap();
        let keys: Vec<_> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/schema.json"));
        assert!(is_url("http://example.com/schema.json"));
        assert!(!is_url("/path/to/schema.json"));
        assert!(!is_url("schema.json"));
    }

    #[test]
    fn load_documents_in_order() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, r#"{{"$id": "a.json"}}"#).unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, r#"{{"$id": "b.json"}}"#).unwrap();

        let sources = [
            first.path().to_str().unwrap(),
            second.path().to_str().unwrap(),
        ];
        let documents = load_documents(&sources).unwrap();
        assert_eq!(documents[0]["$id"], "a.json");
        assert_eq!(documents[1]["$id"], "b.json");
    }

    #[test]
    fn load_documents_stops_at_failure() {
        let result = load_documents(&["/nonexistent/a.json"]);
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_document_url_valid() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/schemas/order.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"$id": "order.json", "type": "object"}"#)
                .create();

            let url = format!("{}/schemas/order.json", server.url());
            let schema = load_document_url(&url).unwrap();
            assert_eq!(schema["$id"], "order.json");
            mock.assert();
        }

        #[test]
        fn load_document_url_404() {
            let mut server = mockito::Server::new();
            let _mock = server.mock("GET", "/missing.json").with_status(404).create();

            let url = format!("{}/missing.json", server.url());
            let result = load_document_url(&url);
            assert!(matches!(result, Err(LoadError::NetworkError { .. })));
        }

        #[test]
        fn load_document_auto_url() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_body(r#"{"type": "string"}"#)
                .create();

            let schema = load_document_auto(&format!("{}/schema.json", server.url())).unwrap();
            assert_eq!(schema["type"], "string");
        }
    }
}
