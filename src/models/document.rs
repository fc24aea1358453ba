//! Render-ready representation of a retrieved artifact.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_PUBLISHED: &str = "Unknown";
pub const DEFAULT_URL: &str = "No URL";
pub const DEFAULT_TEXT: &str = "No Text";
pub const DEFAULT_ENTITY_NAME: &str = "Unknown";

/// A structured document with every field resolved to a value or its default.
///
/// Field order matches display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub title: String,
    pub author: String,
    pub published: String,
    /// Link target; also used as the link label
    pub url: String,
    pub text: String,
    pub persons: Vec<String>,
    pub locations: Vec<String>,
    pub organizations: Vec<String>,
}

impl Default for StructuredDocument {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            published: DEFAULT_PUBLISHED.to_string(),
            url: DEFAULT_URL.to_string(),
            text: DEFAULT_TEXT.to_string(),
            persons: Vec::new(),
            locations: Vec::new(),
            organizations: Vec::new(),
        }
    }
}

impl StructuredDocument {
    /// Whether the url field holds a real link rather than the placeholder.
    pub fn has_url(&self) -> bool {
        self.url != DEFAULT_URL
    }
}

/// What the renderer produces for one artifact: exactly one of the two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayDocument {
    Structured(StructuredDocument),
    Text { content: String },
}

impl DisplayDocument {
    pub fn is_structured(&self) -> bool {
        matches!(self, DisplayDocument::Structured(_))
    }

    pub fn as_structured(&self) -> Option<&StructuredDocument> {
        match self {
            DisplayDocument::Structured(doc) => Some(doc),
            DisplayDocument::Text { .. } => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DisplayDocument::Structured(_) => None,
            DisplayDocument::Text { content } => Some(content),
        }
    }
}
