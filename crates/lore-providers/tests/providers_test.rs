//! Provider and cache integration tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lore_core::config::ProviderConfig;
use lore_core::errors::{LoreError, ProviderError};
use lore_core::retry::RetryPolicy;
use lore_core::traits::{CompletionOptions, ICompletionProvider, IEmbeddingProvider};
use lore_providers::{
    ApiCompletionProvider, ApiEmbeddingProvider, CachedEmbedder, HashedEmbedder, SemanticCache,
};
use test_fixtures::doubles::{CountingEmbedder, FailingEmbedder};

fn unreachable_config() -> ProviderConfig {
    ProviderConfig {
        embedding_endpoint: Some("http://127.0.0.1:9/v1/embeddings".to_string()),
        completion_endpoint: Some("http://127.0.0.1:9/v1/chat/completions".to_string()),
        request_timeout_ms: 500,
        retry: RetryPolicy::none(),
        ..ProviderConfig::default()
    }
}

#[test]
fn cached_embedder_calls_inner_once_per_text() {
    let counting = Arc::new(CountingEmbedder::new(Arc::new(HashedEmbedder::new(64))));
    let cache = Arc::new(SemanticCache::new(100, Duration::from_secs(60)));
    let embedder = CachedEmbedder::new(counting.clone(), cache.clone());

    let first = embedder.embed("morning sunlight").unwrap();
    let second = embedder.embed("Morning Sunlight ").unwrap();
    assert_eq!(first, second);
    assert_eq!(counting.calls(), 1);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn cached_batch_only_embeds_misses() {
    let counting = Arc::new(CountingEmbedder::new(Arc::new(HashedEmbedder::new(64))));
    let cache = Arc::new(SemanticCache::new(100, Duration::from_secs(60)));
    let embedder = CachedEmbedder::new(counting.clone(), cache);

    embedder.embed("dopamine").unwrap();
    let texts = vec![
        "dopamine".to_string(),
        "focus".to_string(),
        "cold exposure".to_string(),
    ];
    let vectors = embedder.embed_batch(&texts).unwrap();
    assert_eq!(vectors.len(), 3);
    assert_eq!(counting.calls(), 3);
    assert_eq!(vectors[0], embedder.embed("dopamine").unwrap());
}

#[test]
fn cached_embedder_propagates_provider_errors() {
    let cache = Arc::new(SemanticCache::new(10, Duration::from_secs(60)));
    let embedder = CachedEmbedder::new(Arc::new(FailingEmbedder { dimensions: 8 }), cache.clone());
    assert!(embedder.embed("anything").is_err());
    assert_eq!(cache.stats().size, 0);
}

#[test]
fn providers_absent_without_endpoints() {
    let config = ProviderConfig::default();
    assert!(ApiEmbeddingProvider::from_config(&config).unwrap().is_none());
    assert!(ApiCompletionProvider::from_config(&config).unwrap().is_none());
}

#[test]
fn unreachable_embedding_endpoint_marks_provider_unavailable() {
    let provider = ApiEmbeddingProvider::from_config(&unreachable_config())
        .unwrap()
        .unwrap();
    assert!(provider.is_available());

    let err = provider.embed("hello").unwrap_err();
    assert!(err.is_transient());
    assert!(!provider.is_available());

    let err = provider.embed("hello").unwrap_err();
    assert!(matches!(
        err,
        LoreError::ProviderError(ProviderError::Unavailable { .. })
    ));

    provider.reset_availability();
    assert!(provider.is_available());
}

/// Serves one canned `(status, body)` response per connection, in order.
fn scripted_server(responses: Vec<(u16, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            drain_request(&mut stream);
            let reason = if status == 200 { "OK" } else { "Service Unavailable" };
            let _ = write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
        }
    });
    format!("http://{addr}/v1/embeddings")
}

fn drain_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
    }
}

#[test]
fn provider_recovers_after_cooldown() {
    let endpoint = scripted_server(vec![
        (503, r#"{"error":"overloaded"}"#),
        (200, r#"{"data":[{"embedding":[0.5,0.5,0.5,0.5],"index":0}]}"#),
    ]);
    let config = ProviderConfig {
        embedding_endpoint: Some(endpoint),
        dimensions: 4,
        request_timeout_ms: 2_000,
        retry: RetryPolicy::none(),
        unavailable_cooldown_ms: 100,
        ..ProviderConfig::default()
    };
    let provider = ApiEmbeddingProvider::from_config(&config).unwrap().unwrap();

    assert!(provider.embed("hello").unwrap_err().is_transient());
    assert!(!provider.is_available());
    let err = provider.embed("hello").unwrap_err();
    assert!(matches!(
        err,
        LoreError::ProviderError(ProviderError::Unavailable { .. })
    ));

    thread::sleep(Duration::from_millis(200));
    assert!(provider.is_available());
    assert_eq!(provider.embed("hello").unwrap(), vec![0.5; 4]);
    assert!(provider.is_available());
}

#[test]
fn cooldown_lets_the_next_call_through() {
    let config = ProviderConfig {
        unavailable_cooldown_ms: 50,
        ..unreachable_config()
    };
    let provider = ApiEmbeddingProvider::from_config(&config).unwrap().unwrap();
    provider.embed("hello").unwrap_err();
    assert!(!provider.is_available());

    thread::sleep(Duration::from_millis(120));
    assert!(provider.is_available());
    // A real attempt again, not the fail-fast error.
    let err = provider.embed("hello").unwrap_err();
    assert!(matches!(
        err,
        LoreError::ProviderError(ProviderError::RequestFailed { .. })
    ));
}

#[test]
fn unreachable_completion_endpoint_fails_transiently() {
    let provider = ApiCompletionProvider::from_config(&unreachable_config())
        .unwrap()
        .unwrap();
    let err = provider
        .complete("paraphrase this", &CompletionOptions::default())
        .unwrap_err();
    assert!(err.is_transient());
    assert!(!provider.is_available());
}

#[test]
fn empty_batch_skips_the_network() {
    let provider = ApiEmbeddingProvider::from_config(&unreachable_config())
        .unwrap()
        .unwrap();
    assert!(provider.embed_batch(&[]).unwrap().is_empty());
    assert!(provider.is_available());
}
