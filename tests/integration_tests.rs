//! Integration tests for docsearch
//!
//! These tests run the search client against an in-process TCP backend that
//! behaves like the reference server: it reads the query with a single read,
//! writes one path per line, and closes the connection.

use docsearch::config::Config;
use docsearch::models::ResultEntry;
use docsearch::store::FsArtifactStore;
use docsearch::transport::{Framing, TcpTransport};
use docsearch::{ClientError, DisplayDocument, SearchClient};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Spawn a backend that answers each connection with `respond(query)`.
/// Received queries are forwarded on the returned channel.
async fn spawn_backend<F>(respond: F) -> (String, mpsc::UnboundedReceiver<String>)
where
    F: Fn(&str) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = [0u8; 1024];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                continue;
            }
            let query = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = respond(&query);
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = tx.send(query);
        }
    });

    (addr, rx)
}

fn client_for(addr: &str, store: FsArtifactStore, page_size: usize) -> SearchClient {
    let transport = TcpTransport::new(addr).framing(Framing::UntilClose);
    SearchClient::new(Arc::new(transport), Arc::new(store)).page_size(page_size)
}

#[tokio::test]
async fn test_search_and_paginate_over_tcp() {
    let (addr, mut queries) = spawn_backend(|_| {
        (0..250)
            .map(|i| format!("docs/{}.json\n", i))
            .collect::<String>()
    })
    .await;

    let client = client_for(&addr, FsArtifactStore::new(), 100);
    let page = client.search("economy").await.unwrap();

    assert_eq!(queries.recv().await.unwrap(), "economy");
    assert_eq!(client.results().len(), 250);
    assert_eq!(page.entries.len(), 100);
    assert_eq!(page.total_pages, 3);
    assert!(!page.has_prev);
    assert!(page.has_next);

    client.next_page();
    let last = client.next_page();
    assert_eq!(last.page_number, 3);
    assert_eq!(last.entries.len(), 50);
    assert_eq!(last.entries[0], ResultEntry::new("docs/200.json"));
    assert!(!last.has_next);
}

#[tokio::test]
async fn test_short_read_framing_accumulates_many_chunks() {
    // One server write of 30 lines read through a 16-byte buffer: every read
    // but the last fills the buffer, so the response spans many chunks.
    let body: String = (0..30).map(|i| format!("docs/{:03}.json\n", i)).collect();
    assert_eq!(body.len(), 420);
    let expected = body.clone();
    let (addr, _queries) = spawn_backend(move |_| body.clone()).await;

    let transport = TcpTransport::new(addr)
        .framing(Framing::ShortRead)
        .read_buffer_size(16);
    let client = SearchClient::new(Arc::new(transport), Arc::new(FsArtifactStore::new()));

    client.search("anything").await.unwrap();
    let results = client.results();
    assert_eq!(results.len(), 30);
    assert_eq!(results.entry(0), Some(&ResultEntry::new("docs/000.json")));
    assert_eq!(results.entry(29), Some(&ResultEntry::new("docs/029.json")));
    let joined: String = results
        .entries()
        .iter()
        .map(|e| format!("{}\n", e))
        .collect();
    assert_eq!(joined, expected);
}

#[tokio::test]
async fn test_empty_response_is_single_empty_page() {
    let (addr, _queries) = spawn_backend(|_| String::new()).await;
    let client = client_for(&addr, FsArtifactStore::new(), 100);

    let page = client.search("nothing matches").await.unwrap();
    assert!(page.entries.is_empty());
    assert_eq!(page.page_number, 1);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_unreachable_backend_is_connection_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let client = client_for(&addr, FsArtifactStore::new(), 100);

    let err = client.search("hello").await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
    assert!(client.results().is_empty());
}

#[tokio::test]
async fn test_search_then_open_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(
        dir.path().join("docs/storm.json"),
        r#"{"title":"Storm warning","author":"Met Office","thread":{"published":"2024-01-02"},"url":"http://example.com/storm","text":"High winds expected.","entities":{"persons":[],"locations":[{"name":"Devon"},{"name":"Cornwall"}],"organizations":[{"name":"Met Office"}]}}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("docs/notes.txt"), "storm notes").unwrap();

    let (addr, _queries) =
        spawn_backend(|_| "docs/storm.json\ndocs/notes.txt\ndocs/missing.json\n".to_string())
            .await;
    let client = client_for(&addr, FsArtifactStore::with_base_dir(dir.path()), 10);
    client.search("storm").await.unwrap();

    let doc = client.open_index(0).await.unwrap();
    let DisplayDocument::Structured(doc) = doc else {
        panic!("expected a structured document");
    };
    assert_eq!(doc.title, "Storm warning");
    assert_eq!(doc.published, "2024-01-02");
    assert_eq!(doc.locations, vec!["Devon", "Cornwall"]);
    assert_eq!(doc.organizations, vec!["Met Office"]);

    let doc = client.open_index(1).await.unwrap();
    assert_eq!(doc.as_text(), Some("storm notes"));

    let err = client.open_index(2).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(client.results().len(), 3);
}

#[tokio::test]
async fn test_overlapping_searches_are_serialized() {
    let (addr, mut queries) = spawn_backend(|q| format!("{}\n", q)).await;
    let client = Arc::new(client_for(&addr, FsArtifactStore::new(), 10));

    let mut handles = Vec::new();
    for i in 0..5 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client.search(&format!("q{}", i)).await
        }));
    }
    for handle in handles {
        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.entries.len(), 1);
    }

    let mut received = Vec::new();
    for _ in 0..5 {
        received.push(queries.recv().await.unwrap());
    }
    received.sort();
    assert_eq!(received, vec!["q0", "q1", "q2", "q3", "q4"]);
    assert_eq!(client.results().len(), 1);
}

#[tokio::test]
async fn test_client_from_config() {
    let (addr, _queries) = spawn_backend(|_| "one\ntwo\nthree\n".to_string()).await;
    let (host, port) = addr.rsplit_once(':').unwrap();

    let mut config = Config::default();
    config.backend.host = host.to_string();
    config.backend.port = port.parse().unwrap();
    config.backend.framing = Framing::UntilClose;
    config.results.page_size = 2;

    let client = SearchClient::from_config(&config);
    let page = client.search("numbers").await.unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(client.next_page().entries, vec![ResultEntry::new("three")]);
}

#[tokio::test]
async fn test_blank_query_opens_no_connection() {
    let (addr, mut queries) = spawn_backend(|_| "x\n".to_string()).await;
    let client = client_for(&addr, FsArtifactStore::new(), 10);

    assert!(matches!(
        client.search(" \t\n").await,
        Err(ClientError::Validation(_))
    ));
    assert!(queries.try_recv().is_err());
}
