use serde::{Deserialize, Serialize};

use super::WorkspaceId;

/// A transcript passage held by the similarity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    pub id: String,
    pub workspace_id: WorkspaceId,
    pub text: String,
    pub source_document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    /// Offset of the passage within the recording, in seconds.
    #[serde(default)]
    pub timestamp_secs: Option<f64>,
    #[serde(default)]
    pub start_offset: usize,
    #[serde(default)]
    pub end_offset: usize,
}

/// A chunk returned from a similarity query, with its raw similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    pub score: f64,
}

/// Optional metadata filters. The workspace filter is applied separately and
/// is never optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkFilter {
    #[serde(default)]
    pub source_document_ids: Option<Vec<String>>,
    #[serde(default)]
    pub speaker: Option<String>,
}

impl ChunkFilter {
    pub fn matches(&self, chunk: &TextChunk) -> bool {
        if let Some(docs) = &self.source_document_ids {
            if !docs.iter().any(|d| d == &chunk.source_document_id) {
                return false;
            }
        }
        if let Some(speaker) = &self.speaker {
            match &chunk.speaker {
                Some(s) if s.eq_ignore_ascii_case(speaker) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Distance metric of a similarity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    #[default]
    Cosine,
    Dot,
    Euclid,
}
