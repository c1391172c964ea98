//! Weighted merge of full-text and vector result lists.

use std::collections::HashMap;

use fathom_core::StoredChunk;

/// Merge two per-source lists: apply each source's weight, sum weighted
/// scores per chunk id, order descending. The first occurrence of a
/// chunk id supplies the row content.
pub fn merge_weighted(
    fts_results: Vec<StoredChunk>,
    vector_results: Vec<StoredChunk>,
    fts_weight: f64,
    vector_weight: f64,
) -> Vec<StoredChunk> {
    let mut scores: HashMap<i64, f64> = HashMap::new();
    let mut rows: HashMap<i64, StoredChunk> = HashMap::new();

    for chunk in fts_results {
        *scores.entry(chunk.chunk_id).or_default() += fts_weight * chunk.score;
        rows.entry(chunk.chunk_id).or_insert(chunk);
    }
    for chunk in vector_results {
        *scores.entry(chunk.chunk_id).or_default() += vector_weight * chunk.score;
        rows.entry(chunk.chunk_id).or_insert(chunk);
    }

    let mut merged: Vec<StoredChunk> = rows
        .into_values()
        .map(|mut chunk| {
            chunk.score = scores[&chunk.chunk_id];
            chunk
        })
        .collect();
    merged.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.chunk_id.cmp(&b.chunk_id))
    });
    merged
}
