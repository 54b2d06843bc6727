//! Store and provider doubles for failure, latency, and call-count scenarios.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lore_core::errors::{LoreResult, ProviderError, StoreError};
use lore_core::models::{Distance, ScoredChunk, WorkspaceId};
use lore_core::traits::{
    CompletionOptions, GraphQuery, GraphRow, GraphWrite, ICompletionProvider,
    IEmbeddingProvider, IEntityAssist, IGraphStore, ISimilarityStore, SimilarityQuery,
    WriteOutcome,
};

fn unavailable(store: &str) -> lore_core::LoreError {
    StoreError::Unavailable {
        store: store.to_string(),
        reason: "connection refused".to_string(),
    }
    .into()
}

/// Graph store whose every call fails transiently.
pub struct UnavailableGraphStore;

impl IGraphStore for UnavailableGraphStore {
    fn read(&self, _: &WorkspaceId, _: &GraphQuery) -> LoreResult<Vec<GraphRow>> {
        Err(unavailable("graph"))
    }

    fn write_batch(&self, _: &WorkspaceId, _: &[GraphWrite]) -> LoreResult<Vec<WriteOutcome>> {
        Err(unavailable("graph"))
    }

    fn name(&self) -> &str {
        "unavailable-graph"
    }
}

/// Similarity store whose every call fails transiently.
pub struct UnavailableSimilarityStore;

impl ISimilarityStore for UnavailableSimilarityStore {
    fn query(&self, _: &SimilarityQuery) -> LoreResult<Vec<ScoredChunk>> {
        Err(unavailable("similarity"))
    }

    fn collection_exists(&self, _: &str) -> LoreResult<bool> {
        Err(unavailable("similarity"))
    }

    fn create_collection(&self, _: &str, _: usize, _: Distance) -> LoreResult<()> {
        Err(unavailable("similarity"))
    }
}

/// Delays every read before delegating.
pub struct SlowGraphStore {
    pub inner: Arc<dyn IGraphStore>,
    pub delay: Duration,
}

impl IGraphStore for SlowGraphStore {
    fn read(&self, workspace: &WorkspaceId, query: &GraphQuery) -> LoreResult<Vec<GraphRow>> {
        thread::sleep(self.delay);
        self.inner.read(workspace, query)
    }

    fn write_batch(
        &self,
        workspace: &WorkspaceId,
        writes: &[GraphWrite],
    ) -> LoreResult<Vec<WriteOutcome>> {
        self.inner.write_batch(workspace, writes)
    }

    fn name(&self) -> &str {
        "slow-graph"
    }
}

/// Delays every query before delegating.
pub struct SlowSimilarityStore {
    pub inner: Arc<dyn ISimilarityStore>,
    pub delay: Duration,
}

impl ISimilarityStore for SlowSimilarityStore {
    fn query(&self, query: &SimilarityQuery) -> LoreResult<Vec<ScoredChunk>> {
        thread::sleep(self.delay);
        self.inner.query(query)
    }

    fn collection_exists(&self, name: &str) -> LoreResult<bool> {
        self.inner.collection_exists(name)
    }

    fn create_collection(&self, name: &str, dimensions: usize, distance: Distance) -> LoreResult<()> {
        self.inner.create_collection(name, dimensions, distance)
    }
}

/// Fails the write batches whose 0-based call numbers are listed.
pub struct FailingBatchesGraphStore {
    pub inner: Arc<dyn IGraphStore>,
    pub fail_on: Vec<usize>,
    calls: AtomicUsize,
}

impl FailingBatchesGraphStore {
    pub fn new(inner: Arc<dyn IGraphStore>, fail_on: Vec<usize>) -> Self {
        Self {
            inner,
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn write_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IGraphStore for FailingBatchesGraphStore {
    fn read(&self, workspace: &WorkspaceId, query: &GraphQuery) -> LoreResult<Vec<GraphRow>> {
        self.inner.read(workspace, query)
    }

    fn write_batch(
        &self,
        workspace: &WorkspaceId,
        writes: &[GraphWrite],
    ) -> LoreResult<Vec<WriteOutcome>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&call) {
            return Err(unavailable("graph"));
        }
        self.inner.write_batch(workspace, writes)
    }

    fn name(&self) -> &str {
        "failing-batches-graph"
    }
}

/// One scripted completion reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
    /// Sleep, then answer.
    Slow(Duration, String),
}

/// Completion provider that replays scripted replies; the last reply repeats.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn text(reply: &str) -> Self {
        Self::new(vec![Reply::Text(reply.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if replies.len() > 1 {
            replies.pop_front().unwrap_or(Reply::Fail)
        } else {
            replies.front().cloned().unwrap_or(Reply::Fail)
        }
    }
}

impl ICompletionProvider for ScriptedCompletion {
    fn complete(&self, prompt: &str, _: &CompletionOptions) -> LoreResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut p) = self.prompts.lock() {
            p.push(prompt.to_string());
        }
        match self.next_reply() {
            Reply::Text(t) => Ok(t),
            Reply::Fail => Err(ProviderError::RequestFailed {
                reason: "scripted failure".to_string(),
            }
            .into()),
            Reply::Slow(delay, t) => {
                thread::sleep(delay);
                Ok(t)
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Embedder that always fails.
pub struct FailingEmbedder {
    pub dimensions: usize,
}

impl IEmbeddingProvider for FailingEmbedder {
    fn embed(&self, _: &str) -> LoreResult<Vec<f32>> {
        Err(ProviderError::Unavailable {
            provider: "failing".to_string(),
        }
        .into())
    }

    fn embed_batch(&self, _: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        Err(ProviderError::Unavailable {
            provider: "failing".to_string(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Counts calls to an inner embedder.
pub struct CountingEmbedder {
    pub inner: Arc<dyn IEmbeddingProvider>,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(inner: Arc<dyn IEmbeddingProvider>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IEmbeddingProvider for CountingEmbedder {
    fn embed(&self, text: &str) -> LoreResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text)
    }

    fn embed_batch(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}

/// Entity assist returning fixed suggestions, optionally failing or stalling.
pub struct ScriptedEntityAssist {
    pub suggestions: Vec<String>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl IEntityAssist for ScriptedEntityAssist {
    fn suggest(&self, _: &str, _: &[String]) -> LoreResult<Vec<String>> {
        if let Some(d) = self.delay {
            thread::sleep(d);
        }
        if self.fail {
            return Err(ProviderError::RequestFailed {
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        Ok(self.suggestions.clone())
    }
}
