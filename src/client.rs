//! Search client: the two operations a presenter needs.
//!
//! [`SearchClient::search`] sends a query through a [`Transport`] and loads
//! the response into the client's [`ResultSet`]. [`SearchClient::open`]
//! fetches an entry's artifact from an [`ArtifactStore`] and renders it.
//!
//! The client is `Send + Sync` and meant to be shared behind an `Arc`, so a
//! presenter can run `search` on a spawned task while its own loop stays
//! responsive. Overlapping searches are queued and run one at a time.
//! Results are applied only after the full response has arrived, and a
//! failed search leaves the previous results in place.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::models::{DisplayDocument, Page, Query, ResultEntry, ResultSet, DEFAULT_PAGE_SIZE};
use crate::render::render;
use crate::store::{ArtifactStore, FsArtifactStore, StoreError};
use crate::transport::{TcpTransport, Transport, TransportError};
use crate::utils::validate::{exceeds_backend_read, ValidationError};

/// Errors surfaced by [`SearchClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The query was rejected before any network activity
    #[error("Invalid query: {0}")]
    Validation(#[from] ValidationError),

    /// The backend could not be reached
    #[error("{0}")]
    Connection(TransportError),

    /// The exchange with the backend failed after connecting
    #[error("{0}")]
    Transport(TransportError),

    /// The selected artifact does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The artifact exists but could not be read
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        if err.is_connection() {
            ClientError::Connection(err)
        } else {
            ClientError::Transport(err)
        }
    }
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => ClientError::NotFound(path),
            other => ClientError::Storage(other.to_string()),
        }
    }
}

/// Orchestrates queries, pagination, and document rendering.
#[derive(Debug)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn ArtifactStore>,
    results: Mutex<ResultSet>,
    query_gate: tokio::sync::Mutex<()>,
    page_size: usize,
    max_query_bytes: usize,
}

impl SearchClient {
    /// Create a client over the given transport and store.
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            transport,
            store,
            results: Mutex::new(ResultSet::new(DEFAULT_PAGE_SIZE)),
            query_gate: tokio::sync::Mutex::new(()),
            page_size: DEFAULT_PAGE_SIZE,
            max_query_bytes: crate::config::BackendConfig::default().max_query_bytes,
        }
    }

    /// Create a client that talks TCP to the configured backend and reads
    /// artifacts from the filesystem.
    pub fn from_config(config: &Config) -> Self {
        let transport = TcpTransport::from_config(&config.backend);
        let store = match &config.artifacts.base_dir {
            Some(dir) => FsArtifactStore::with_base_dir(dir),
            None => FsArtifactStore::new(),
        };

        Self::new(Arc::new(transport), Arc::new(store))
            .page_size(config.results.page_size)
            .max_query_bytes(config.backend.max_query_bytes)
    }

    /// Set the page size used for result sets. Zero is treated as one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.results = Mutex::new(ResultSet::new(self.page_size));
        self
    }

    /// Set the query length above which a truncation warning is logged
    pub fn max_query_bytes(mut self, max: usize) -> Self {
        self.max_query_bytes = max;
        self
    }

    /// Run a query and replace the current results with its response.
    ///
    /// Returns the first page of the new results.
    pub async fn search(&self, text: &str) -> Result<Page, ClientError> {
        let query = Query::new(text)?;
        if exceeds_backend_read(query.as_str(), self.max_query_bytes) {
            tracing::warn!(
                "Query is {} bytes; the backend may only read the first {}",
                query.as_bytes().len(),
                self.max_query_bytes
            );
        }

        let _in_flight = self.query_gate.lock().await;
        tracing::info!("Searching for {:?}", query.as_str());

        let response = match self.transport.query(&query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", query.as_str(), e);
                return Err(e.into());
            }
        };

        let results = ResultSet::from_response(&response.into_text(), self.page_size);
        tracing::info!(
            "Query {:?} returned {} results ({} pages)",
            query.as_str(),
            results.len(),
            results.total_pages()
        );

        let mut current = self.lock_results();
        *current = results;
        Ok(current.page())
    }

    /// The current page of results.
    pub fn page(&self) -> Page {
        self.lock_results().page()
    }

    /// Move to the next page, if any, and return the current page.
    pub fn next_page(&self) -> Page {
        let mut results = self.lock_results();
        results.next();
        results.page()
    }

    /// Move to the previous page, if any, and return the current page.
    pub fn prev_page(&self) -> Page {
        let mut results = self.lock_results();
        results.prev();
        results.page()
    }

    /// A copy of the current result set.
    pub fn results(&self) -> ResultSet {
        self.lock_results().clone()
    }

    /// Entry at a global index in the current results.
    pub fn entry(&self, index: usize) -> Option<ResultEntry> {
        self.lock_results().entry(index).cloned()
    }

    /// Retrieve and render the artifact named by `entry`.
    pub async fn open(&self, entry: &ResultEntry) -> Result<DisplayDocument, ClientError> {
        let bytes = self.store.fetch(entry).await?;
        let document = render(&bytes);
        tracing::debug!(
            "Rendered {} as {}",
            entry,
            if document.is_structured() {
                "structured document"
            } else {
                "text"
            }
        );
        Ok(document)
    }

    /// Open the entry at a global index in the current results.
    pub async fn open_index(&self, index: usize) -> Result<DisplayDocument, ClientError> {
        let entry = self
            .entry(index)
            .ok_or_else(|| ClientError::NotFound(format!("no result at index {}", index)))?;
        self.open(&entry).await
    }

    fn lock_results(&self) -> MutexGuard<'_, ResultSet> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
