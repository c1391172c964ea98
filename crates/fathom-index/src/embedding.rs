//! Deterministic fallback embedding provider.
//!
//! Hashes terms into fixed-dimension buckets weighted by term frequency,
//! then L2-normalizes. Not semantically rich, but dependency-free and
//! stable across runs — texts sharing terms land in shared buckets, so
//! cosine similarity tracks lexical overlap. Used by tests and as the
//! default when no real model is injected.

use std::collections::HashMap;

use fathom_core::errors::FathomResult;
use fathom_core::traits::{EmbedKind, IEmbeddingProvider};

pub struct HashedEmbedding {
    dimensions: usize,
}

impl HashedEmbedding {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// FNV-1a bucket index for a term.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for token in &tokens {
            *tf.entry(token.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &tf {
            let freq = count / total;
            let weight = 1.0 + (term.len() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashedEmbedding {
    fn embed(&self, text: &str, _kind: EmbedKind) -> FathomResult<Vec<f32>> {
        Ok(self.vector_for(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-fallback"
    }
}
