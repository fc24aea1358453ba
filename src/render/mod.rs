//! Document rendering.
//!
//! [`render`] turns the raw bytes of an artifact into a [`DisplayDocument`].
//! Artifacts that parse as a JSON object are read as structured news-style
//! documents:
//!
//! ```json
//! {
//!   "title": "...",
//!   "author": "...",
//!   "url": "...",
//!   "text": "...",
//!   "thread": { "published": "..." },
//!   "entities": {
//!     "persons": [{ "name": "..." }],
//!     "locations": [{ "name": "..." }],
//!     "organizations": [{ "name": "..." }]
//!   }
//! }
//! ```
//!
//! Every path in that shape is optional. Missing values, including a missing
//! `thread` or `entities` object, resolve to the defaults in
//! [`crate::models`]. Anything that is not a JSON object is shown verbatim as
//! text. Rendering never fails.

use serde_json::Value;

use crate::models::{
    DisplayDocument, StructuredDocument, DEFAULT_AUTHOR, DEFAULT_ENTITY_NAME, DEFAULT_PUBLISHED,
    DEFAULT_TEXT, DEFAULT_TITLE, DEFAULT_URL,
};

/// Render artifact bytes for display.
pub fn render(bytes: &[u8]) -> DisplayDocument {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => DisplayDocument::Structured(structured(&value)),
        Ok(_) => {
            tracing::debug!("Artifact is JSON but not an object - rendering as text");
            text(bytes)
        }
        Err(e) => {
            tracing::debug!("Artifact is not structured ({}) - rendering as text", e);
            text(bytes)
        }
    }
}

fn text(bytes: &[u8]) -> DisplayDocument {
    DisplayDocument::Text {
        content: String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn structured(root: &Value) -> StructuredDocument {
    StructuredDocument {
        title: string_at(root, "/title", DEFAULT_TITLE),
        author: string_at(root, "/author", DEFAULT_AUTHOR),
        published: string_at(root, "/thread/published", DEFAULT_PUBLISHED),
        url: string_at(root, "/url", DEFAULT_URL),
        text: string_at(root, "/text", DEFAULT_TEXT),
        persons: names_at(root, "/entities/persons"),
        locations: names_at(root, "/entities/locations"),
        organizations: names_at(root, "/entities/organizations"),
    }
}

/// Resolve a JSON pointer to display text, falling back to `default` when any
/// segment of the path is missing or the value is not a scalar.
fn string_at(root: &Value, pointer: &str, default: &str) -> String {
    match root.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Collect the `name` of each object in the array at `pointer`, keeping order.
fn names_at(root: &Value, pointer: &str) -> Vec<String> {
    match root.pointer(pointer) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| string_at(item, "/name", DEFAULT_ENTITY_NAME))
            .collect(),
        _ => Vec::new(),
    }
}
