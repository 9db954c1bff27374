//! Schema references and JSON Pointer (RFC 6901) fragments.
//!
//! A reference has the form `identifier#/json/pointer`. The fragment may be
//! empty or `/` to address the document root.

use serde_json::Value;

/// Split a reference on its first `#` into `(identifier, fragment)`.
///
/// A reference without `#` addresses the root of the identified document.
pub fn split_reference(reference: &str) -> (&str, &str) {
    match reference.find('#') {
        Some(idx) => (&reference[..idx], &reference[idx + 1..]),
        None => (reference, ""),
    }
}

/// Strip a trailing `#` or `#/` from a document identifier.
pub fn normalize_identifier(id: &str) -> &str {
    id.strip_suffix("#/")
        .or_else(|| id.strip_suffix('#'))
        .unwrap_or(id)
}

/// Whether a fragment addresses the document root.
pub fn is_root_fragment(fragment: &str) -> bool {
    fragment.is_empty() || fragment == "/"
}

/// Decode one pointer segment: `~1` to `/`, then `~0` to `~`, then percent-decoding.
///
/// A segment that does not percent-decode to valid UTF-8 is kept as unescaped.
pub fn unescape_segment(segment: &str) -> String {
    let unescaped = segment.replace("~1", "/").replace("~0", "~");
    let decoded = urlencoding::decode(&unescaped)
        .ok()
        .map(|s| s.into_owned());
    decoded.unwrap_or(unescaped)
}

/// Encode a property name so that [`unescape_segment`] gives it back unchanged.
pub fn escape_segment(name: &str) -> String {
    name.replace('~', "~0")
        .replace('/', "~1")
        .replace('%', "%25")
}

/// Append one escaped segment to a reference's fragment.
///
/// `child_reference("a.json#", "properties")` is `a.json#/properties`.
pub fn child_reference(reference: &str, segment: &str) -> String {
    let (id, fragment) = split_reference(reference);
    let fragment = if fragment == "/" { "" } else { fragment };
    format!("{}#{}/{}", id, fragment, escape_segment(segment))
}

/// Resolve a `$ref` value found inside the document addressed by `base`.
///
/// Fragment-only references (`#`, `#/definitions/x`) stay within that
/// document; anything else is taken as a full `identifier#fragment`.
pub fn join_reference(base: &str, target: &str) -> String {
    if target.starts_with('#') {
        let (id, _) = split_reference(base);
        format!("{}{}", id, target)
    } else {
        target.to_string()
    }
}

/// Key identifying the node a reference addresses, used for cycle detection.
///
/// Both root spellings (`id#` and `id#/`) map to the same key, as do
/// segments that decode to the same name (`a b` and `a%20b`).
pub fn visit_key(reference: &str) -> (String, String) {
    let (id, fragment) = split_reference(reference);
    let fragment = if is_root_fragment(fragment) {
        String::new()
    } else {
        fragment
            .split('/')
            .skip(1)
            .map(|part| format!("/{}", escape_segment(&unescape_segment(part))))
            .collect()
    };
    (normalize_identifier(id).to_string(), fragment)
}

/// Descend into `document` following a pointer fragment.
///
/// Returns `None` as soon as a segment is missing. Arrays are indexed by
/// decimal segments without leading zeros; scalars cannot be descended into.
pub fn navigate<'a>(document: &'a Value, fragment: &str) -> Option<&'a Value> {
    if is_root_fragment(fragment) {
        return Some(document);
    }

    let mut current = document;
    for part in fragment.split('/').skip(1) {
        let key = unescape_segment(part);
        current = match current {
            Value::Object(map) => map.get(&key)?,
            Value::Array(items) => items.get(parse_index(&key)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn parse_index(segment: &str) -> Option<usize> {
    let digits_only = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    segment.parse().ok()
}
