//! Ranked results returned by the retrieval paths.

use serde::{Deserialize, Serialize};

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Memory,
    Persistent,
}

/// A single ranked hit.
///
/// Scores are monotone (higher = better) but not comparable across
/// strategies; fusion normalizes before combining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub doc_id: String,
    pub seq_no: u32,
    pub score: f64,
    pub text: String,
    /// Set by the hybrid coordinator; `None` for single-tier queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResultSource>,
}

impl RetrievalResult {
    pub fn new(doc_id: impl Into<String>, seq_no: u32, score: f64, text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            seq_no,
            score,
            text: text.into(),
            source: None,
        }
    }

    /// De-duplication key, matching [`crate::Chunk::doc_key`].
    pub fn doc_key(&self) -> String {
        format!("{}_{}", self.doc_id, self.seq_no)
    }
}

/// A row materialized from the persistent chunk store.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    /// Rowid in the chunk table.
    pub chunk_id: i64,
    pub doc_id: String,
    pub seq_no: u32,
    pub topic: String,
    pub content: String,
    pub score: f64,
}

impl StoredChunk {
    pub fn doc_key(&self) -> String {
        format!("{}_{}", self.doc_id, self.seq_no)
    }

    /// Convert to the public result type.
    pub fn into_result(self, source: Option<ResultSource>) -> RetrievalResult {
        RetrievalResult {
            doc_id: self.doc_id,
            seq_no: self.seq_no,
            score: self.score,
            text: self.content,
            source,
        }
    }
}
