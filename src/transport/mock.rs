//! Mock transport for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::Query;
use crate::transport::{RawResponse, Transport, TransportError};

/// A mock transport that returns a predefined response and records the
/// queries it receives.
#[derive(Debug, Default)]
pub struct MockTransport {
    response: Mutex<Option<Result<RawResponse, TransportError>>>,
    queries: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a new mock transport that answers every query with an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport that answers with `text`.
    pub fn with_response(text: &str) -> Self {
        let mock = Self::new();
        mock.set_response(text);
        mock
    }

    /// Set the response text to return.
    pub fn set_response(&self, text: &str) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(Ok(RawResponse::from(text)));
    }

    /// Make every following query fail with `error`.
    pub fn set_error(&self, error: TransportError) {
        let mut guard = self.response.lock().unwrap();
        *guard = Some(Err(error));
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of queries received so far.
    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn query(&self, query: &Query) -> Result<RawResponse, TransportError> {
        self.queries.lock().unwrap().push(query.as_str().to_string());

        let guard = self.response.lock().unwrap();
        match &*guard {
            Some(result) => result.clone(),
            None => Ok(RawResponse::default()),
        }
    }
}
