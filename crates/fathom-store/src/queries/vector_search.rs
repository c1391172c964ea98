//! Vector similarity search over the embedding blob table.
//!
//! Brute-force scan computing cosine similarity in Rust. This is the
//! portable reference path; a loaded vector extension upgrades the
//! capability state but searches still run through this scan.

use rusqlite::Connection;

use fathom_core::errors::FathomResult;
use fathom_core::StoredChunk;

use crate::from_sqlite;

/// Top-`limit` chunks by cosine similarity against the query embedding.
/// Stored vectors with a different dimension are skipped.
pub fn search_vector(
    conn: &Connection,
    query_embedding: &[f32],
    limit: usize,
) -> FathomResult<Vec<StoredChunk>> {
    if query_embedding.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.doc_id, c.seq_no, c.topic, c.content, e.vector
             FROM embeddings e
             JOIN chunks c ON e.chunk_id = c.id",
        )
        .map_err(from_sqlite)?;

    let expected_bytes = query_embedding.len() * 4;
    let rows = stmt
        .query_map([], |row| {
            let blob: Vec<u8> = row.get(5)?;
            super::parse_chunk_row(row, 0.0).map(|chunk| (chunk, blob))
        })
        .map_err(from_sqlite)?;

    let mut scored = Vec::new();
    for row in rows {
        let (mut chunk, blob) = row.map_err(from_sqlite)?;
        if blob.len() != expected_bytes {
            continue;
        }
        let stored = blob_to_vector(&blob);
        chunk.score = cosine_similarity(query_embedding, &stored);
        scored.push(chunk);
    }

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.chunk_id.cmp(&b.chunk_id))
    });
    scored.truncate(limit);
    Ok(scored)
}

/// Encode an f32 slice as a little-endian blob.
pub fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode a little-endian blob back into f32 values.
pub fn blob_to_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
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

    #[test]
    fn blob_round_trip_preserves_values() {
        let vector = vec![0.25f32, -1.5, 3.75, 0.0];
        let blob = vector_to_blob(&vector);
        assert_eq!(blob.len(), 16);
        assert_eq!(blob_to_vector(&blob), vector);
    }

    #[test]
    fn identical_vectors_have_unit_similarity() {
        let v = [0.6f32, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_similarity_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
