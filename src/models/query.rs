//! Validated free-text search query.

use serde::Serialize;
use std::fmt;

use crate::utils::validate::{validate_query, ValidationError};

/// A query that has passed validation and is ready to be sent to the backend.
///
/// The text is kept exactly as given; it is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Validate `text` and build a query from it.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        validate_query(text).map(|text| Self(text.to_string()))
    }

    /// The query text as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The wire payload: raw UTF-8 bytes, no delimiter, no length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_original_text() {
        let query = Query::new("  climate change \n").unwrap();
        assert_eq!(query.as_str(), "  climate change \n");
        assert_eq!(query.as_bytes(), b"  climate change \n");
    }

    #[test]
    fn test_query_rejects_blank() {
        assert!(matches!(Query::new(" \t "), Err(ValidationError::EmptyQuery)));
    }
}
