//! # docsearch
//!
//! A client for a line-oriented document search backend. A query is sent
//! over TCP, the newline-separated result paths are paged through in memory,
//! and any result can be opened and rendered, either as a structured
//! document or as plain text.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`transport`]: Backend connection and response framing
//! - [`models`]: Queries, result sets with pagination, and rendered documents
//! - [`store`]: Artifact retrieval by result entry
//! - [`render`]: Structured-document detection and rendering
//! - [`client`]: The search client tying the pieces together
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal presentation for the CLI
//! - [`utils`]: Input validation

pub mod client;
pub mod config;
pub mod models;
pub mod render;
pub mod store;
pub mod transport;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use client::{ClientError, SearchClient};
pub use models::{DisplayDocument, Page, ResultEntry, ResultSet};
pub use render::render;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
