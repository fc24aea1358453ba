//! Input validation for search queries.
//!
//! Queries are checked before any network activity so that a rejected query
//! never opens a connection to the backend.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Query is empty")]
    EmptyQuery,
}

/// Validate a query, returning it unchanged.
///
/// Only blank queries are rejected. Surrounding whitespace is ignored for the
/// check but kept in the returned text, which is what goes on the wire.
pub fn validate_query(text: &str) -> Result<&str, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(text)
}

/// Whether a query payload is longer than the backend reads in one go.
///
/// The reference backend reads the query with a single fixed-size read and
/// silently drops the rest.
pub fn exceeds_backend_read(text: &str, max_bytes: usize) -> bool {
    text.len() > max_bytes
}
