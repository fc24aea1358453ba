//! Core data models for queries, result sets, and rendered documents.

mod document;
mod query;
mod result_set;

pub use document::{
    DisplayDocument, StructuredDocument, DEFAULT_AUTHOR, DEFAULT_ENTITY_NAME, DEFAULT_PUBLISHED,
    DEFAULT_TEXT, DEFAULT_TITLE, DEFAULT_URL,
};
pub use query::Query;
pub use result_set::{Page, ResultEntry, ResultSet, DEFAULT_PAGE_SIZE};
