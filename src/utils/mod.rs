//! Utility modules.
//!
//! - [`validate`]: query validation run before any network activity

pub mod validate;

pub use validate::{exceeds_backend_read, validate_query, ValidationError};
