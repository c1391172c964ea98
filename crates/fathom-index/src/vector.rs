//! Flat reference vector store: brute-force cosine similarity over all
//! stored vectors. Suitable as the test baseline; a production ANN
//! backend plugs in behind the same trait.

use parking_lot::RwLock;
use tracing::warn;

use fathom_core::traits::{IVectorStore, VectorHit, VectorRecord};

struct StoredVector {
    vector: Vec<f32>,
    vector_id: u64,
    record: VectorRecord,
}

/// Brute-force top-K cosine store with a fixed dimension.
pub struct FlatVectorStore {
    dimension: usize,
    entries: RwLock<Vec<StoredVector>>,
}

impl FlatVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl IVectorStore for FlatVectorStore {
    fn reset(&mut self) {
        self.entries.write().clear();
    }

    fn insert(&mut self, vector: Vec<f32>, vector_id: u64, record: VectorRecord) {
        if vector.len() != self.dimension {
            warn!(
                expected = self.dimension,
                actual = vector.len(),
                vector_id,
                "dropping vector with mismatched dimension"
            );
            return;
        }
        self.entries.write().push(StoredVector {
            vector,
            vector_id,
            record,
        });
    }

    fn search(&self, query: &[f32], limit: usize) -> Vec<VectorHit> {
        if limit == 0 || query.is_empty() {
            return Vec::new();
        }
        let entries = self.entries.read();
        let mut hits: Vec<VectorHit> = entries
            .iter()
            .map(|stored| VectorHit {
                vector_id: stored.vector_id,
                record: stored.record.clone(),
                similarity: cosine_similarity(query, &stored.vector),
            })
            .collect();
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.vector_id.cmp(&b.vector_id))
        });
        hits.truncate(limit);
        hits
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Cosine similarity in f64 for stable ordering; zero-norm inputs score 0.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(doc_id: &str, seq_no: u32) -> VectorRecord {
        VectorRecord {
            doc_id: doc_id.to_string(),
            seq_no,
            content: format!("{doc_id} body"),
        }
    }

    #[test]
    fn nearest_vector_ranks_first() {
        let mut store = FlatVectorStore::new(3);
        store.insert(vec![1.0, 0.0, 0.0], 0, record("a", 0));
        store.insert(vec![0.0, 1.0, 0.0], 1, record("b", 0));
        store.insert(vec![0.9, 0.1, 0.0], 2, record("c", 0));

        let hits = store.search(&[1.0, 0.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].record.doc_id, "a");
        assert_eq!(hits[1].record.doc_id, "c");
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[test]
    fn search_returns_top_k_regardless_of_match_quality() {
        let mut store = FlatVectorStore::new(2);
        store.insert(vec![1.0, 0.0], 0, record("a", 0));
        store.insert(vec![0.0, 1.0], 1, record("b", 0));
        // An orthogonal query still returns its top-K.
        let hits = store.search(&[0.0, 1.0], 5);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn mismatched_dimension_is_dropped() {
        let mut store = FlatVectorStore::new(4);
        store.insert(vec![1.0, 0.0], 0, record("a", 0));
        assert!(store.is_empty());
    }

    #[test]
    fn reset_clears_entries() {
        let mut store = FlatVectorStore::new(2);
        store.insert(vec![1.0, 0.0], 0, record("a", 0));
        store.reset();
        assert!(store.is_empty());
        assert!(store.search(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn zero_norm_query_scores_zero() {
        let mut store = FlatVectorStore::new(2);
        store.insert(vec![1.0, 0.0], 0, record("a", 0));
        let hits = store.search(&[0.0, 0.0], 1);
        assert_eq!(hits[0].similarity, 0.0);
    }

    #[test]
    fn cosine_similarity_is_symmetric_and_bounded() {
        let a = [0.3f32, 0.7, 0.1];
        let b = [0.5f32, 0.2, 0.9];
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
        assert!((-1.0..=1.0).contains(&ab));
    }
}
