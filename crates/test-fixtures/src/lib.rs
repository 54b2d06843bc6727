//! Test fixtures: a small wellness-podcast transcript corpus with its extracted
//! concept graph, plus store/provider doubles for failure scenarios.
//!
//! Helpers panic on malformed fixtures; they are only used from tests.

pub mod doubles;

use lore_core::models::{
    ConceptNode, ConceptType, RelationshipEdge, RelationshipType, TextChunk, WorkspaceId,
};
use lore_core::traits::{GraphWrite, IEmbeddingProvider, IGraphStore};
use serde::Deserialize;

/// Raw corpus JSON.
pub const CORPUS_JSON: &str = include_str!("../data/wellness_corpus.json");

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
    pub workspace: String,
    pub collection: String,
    pub documents: Vec<DocumentFixture>,
    pub concepts: Vec<ConceptFixture>,
    pub relationships: Vec<RelationshipFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentFixture {
    pub id: String,
    pub title: String,
    pub chunks: Vec<ChunkFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkFixture {
    pub speaker: String,
    pub timestamp_secs: f64,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptFixture {
    pub name: String,
    pub concept_type: ConceptType,
    pub description: String,
    pub documents: Vec<String>,
    pub speakers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipFixture {
    pub source: String,
    pub target: String,
    pub relationship: RelationshipType,
    pub description: String,
    pub documents: Vec<String>,
}

/// Parse the bundled corpus.
pub fn corpus() -> Corpus {
    serde_json::from_str(CORPUS_JSON)
        .unwrap_or_else(|e| panic!("Failed to parse wellness corpus: {e}"))
}

pub fn workspace(name: &str) -> WorkspaceId {
    WorkspaceId::new(name).unwrap_or_else(|e| panic!("bad workspace {name}: {e}"))
}

/// A concept node present in the given documents.
pub fn node(name: &str, concept_type: ConceptType, documents: &[&str]) -> ConceptNode {
    ConceptNode::new(name, concept_type).with_documents(documents.iter().copied())
}

impl Corpus {
    pub fn workspace_id(&self) -> WorkspaceId {
        workspace(&self.workspace)
    }

    /// Chunks with ids `<document>#<index>`, offsets accumulated per document.
    pub fn chunks(&self) -> Vec<TextChunk> {
        let ws = self.workspace_id();
        let mut out = Vec::new();
        for doc in &self.documents {
            let mut offset = 0;
            for (i, c) in doc.chunks.iter().enumerate() {
                let end = offset + c.text.len();
                out.push(TextChunk {
                    id: format!("{}#{i}", doc.id),
                    workspace_id: ws.clone(),
                    text: c.text.clone(),
                    source_document_id: doc.id.clone(),
                    title: Some(doc.title.clone()),
                    speaker: Some(c.speaker.clone()),
                    timestamp_secs: Some(c.timestamp_secs),
                    start_offset: offset,
                    end_offset: end,
                });
                offset = end + 1;
            }
        }
        out
    }

    pub fn nodes(&self) -> Vec<ConceptNode> {
        self.concepts
            .iter()
            .map(|c| {
                ConceptNode::new(&c.name, c.concept_type)
                    .with_description(&c.description)
                    .with_documents(c.documents.iter().cloned())
                    .with_speakers(c.speakers.iter().cloned())
            })
            .collect()
    }

    pub fn edges(&self) -> Vec<RelationshipEdge> {
        self.relationships
            .iter()
            .map(|r| {
                RelationshipEdge::new(&r.source, &r.target, r.relationship)
                    .with_description(&r.description)
                    .with_documents(r.documents.iter().cloned())
            })
            .collect()
    }

    /// Node upserts followed by edge upserts.
    pub fn graph_writes(&self) -> Vec<GraphWrite> {
        self.nodes()
            .into_iter()
            .map(GraphWrite::UpsertNode)
            .chain(self.edges().into_iter().map(GraphWrite::UpsertEdge))
            .collect()
    }

    /// Write the concept graph into `store` and return the workspace.
    pub fn seed_graph(&self, store: &dyn IGraphStore) -> WorkspaceId {
        let ws = self.workspace_id();
        store
            .write_batch(&ws, &self.graph_writes())
            .unwrap_or_else(|e| panic!("Failed to seed graph: {e}"));
        ws
    }

    /// Every chunk paired with its embedding.
    pub fn embedded_chunks(&self, embedder: &dyn IEmbeddingProvider) -> Vec<(TextChunk, Vec<f32>)> {
        let chunks = self.chunks();
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder
            .embed_batch(&texts)
            .unwrap_or_else(|e| panic!("Failed to embed corpus: {e}"));
        chunks.into_iter().zip(vectors).collect()
    }

    pub fn document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_parses_and_ids_resolve() {
        let c = corpus();
        assert_eq!(c.documents.len(), 4);
        let ids: Vec<String> = c.nodes().into_iter().map(|n| n.id).collect();
        for edge in c.edges() {
            assert!(ids.contains(&edge.source_id), "{}", edge.source_id);
            assert!(ids.contains(&edge.target_id), "{}", edge.target_id);
        }
    }

    #[test]
    fn chunk_ids_are_unique() {
        let chunks = corpus().chunks();
        let mut ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), chunks.len());
    }
}
