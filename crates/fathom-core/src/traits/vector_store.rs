//! Vector store abstraction for the in-memory tier.
//!
//! The store does not own chunk text; it keeps just enough metadata to
//! reconstruct a retrieval result. The contract does not promise exact
//! nearest neighbors — an ANN backend may substitute for the flat
//! reference implementation.

/// Metadata stored alongside each vector.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub doc_id: String,
    pub seq_no: u32,
    pub content: String,
}

/// A single similarity hit. `similarity` is cosine-based, higher = more
/// similar.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub vector_id: u64,
    pub record: VectorRecord,
    pub similarity: f64,
}

/// Pluggable approximate-nearest-neighbor structure. Dimensionality is
/// fixed per instance at construction.
pub trait IVectorStore: Send + Sync {
    /// Drop all stored vectors.
    fn reset(&mut self);

    /// Insert a vector with its id and metadata.
    fn insert(&mut self, vector: Vec<f32>, vector_id: u64, record: VectorRecord);

    /// Top-`limit` most similar stored vectors, ordered by similarity
    /// descending.
    fn search(&self, query: &[f32], limit: usize) -> Vec<VectorHit>;

    /// Fixed vector dimension.
    fn dimensions(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
