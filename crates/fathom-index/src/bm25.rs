//! In-memory inverted index with Okapi BM25 scoring.
//!
//! `fit` rebuilds the term-frequency and document-frequency tables under
//! exclusive access; queries take shared access and may run concurrently
//! with each other. Token positions are not retained.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use fathom_core::config::Bm25Config;
use fathom_core::Chunk;

use crate::tokenizer::{Language, Tokenizer};

#[derive(Default)]
struct Bm25State {
    doc_count: usize,
    /// Mean pre-filter document length in tokens.
    avgdl: f64,
    /// term → number of documents containing it.
    df: HashMap<String, usize>,
    /// Per-document term → count, in fit order.
    tfs: Vec<HashMap<String, usize>>,
    /// Cached per-document token totals.
    doc_lens: Vec<f64>,
}

/// BM25 index over a fitted chunk sequence. Results reference chunks by
/// their index in the fitted slice.
pub struct Bm25Index {
    k1: f64,
    b: f64,
    tokenizer: Tokenizer,
    state: RwLock<Bm25State>,
}

impl Bm25Index {
    pub fn new(config: &Bm25Config) -> Self {
        Self::with_tokenizer(config, Tokenizer::default())
    }

    pub fn with_tokenizer(config: &Bm25Config, tokenizer: Tokenizer) -> Self {
        Self {
            k1: config.k1,
            b: config.b,
            tokenizer,
            state: RwLock::new(Bm25State::default()),
        }
    }

    /// Rebuild the index from a chunk sequence. Blocks concurrent
    /// readers until complete.
    pub fn fit(&self, chunks: &[Chunk]) {
        let mut state = self.state.write();
        state.doc_count = chunks.len();
        state.df.clear();
        state.tfs = Vec::with_capacity(chunks.len());
        state.doc_lens = Vec::with_capacity(chunks.len());

        let mut total_len = 0.0;
        for chunk in chunks {
            let tokens = self
                .tokenizer
                .tokenize(&chunk.text, Language::from_hint(&chunk.language));
            let mut tf: HashMap<String, usize> = HashMap::new();
            for token in &tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *state.df.entry(term.clone()).or_insert(0) += 1;
            }
            total_len += tokens.len() as f64;
            state.doc_lens.push(tokens.len() as f64);
            state.tfs.push(tf);
        }
        state.avgdl = if chunks.is_empty() {
            0.0
        } else {
            total_len / chunks.len() as f64
        };
        debug!(
            docs = state.doc_count,
            terms = state.df.len(),
            avgdl = state.avgdl,
            "bm25 index fitted"
        );
    }

    /// Score all documents against the query terms and return the top-K
    /// `(chunk_index, score)` pairs, descending by score with ties broken
    /// by ascending index. Unknown terms contribute exactly 0.
    pub fn query(&self, terms: &[String], top_k: usize) -> Vec<(usize, f64)> {
        if top_k == 0 {
            return Vec::new();
        }
        let state = self.state.read();
        let avgdl = if state.avgdl > 0.0 { state.avgdl } else { 1.0 };

        let mut scores: Vec<(usize, f64)> = Vec::with_capacity(state.doc_count);
        for i in 0..state.doc_count {
            let doc_len = state.doc_lens[i];
            let mut score = 0.0;
            for term in terms {
                let f = state.tfs[i].get(term).copied().unwrap_or(0) as f64;
                let term_idf = idf(&state, term);
                let denom = f + self.k1 * (1.0 - self.b + self.b * doc_len / avgdl);
                if denom > 0.0 {
                    score += term_idf * (f * (self.k1 + 1.0)) / denom;
                }
            }
            scores.push((i, score));
        }

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scores.truncate(top_k);
        scores
    }

    /// Tokenize a query text, then score.
    pub fn query_text(&self, text: &str, top_k: usize, lang: Language) -> Vec<(usize, f64)> {
        let terms = self.tokenizer.tokenize(text, lang);
        self.query(&terms, top_k)
    }

    /// Number of fitted documents.
    pub fn doc_count(&self) -> usize {
        self.state.read().doc_count
    }

    /// Mean document length used for normalization.
    pub fn avgdl(&self) -> f64 {
        self.state.read().avgdl
    }

    /// Number of documents containing a term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.state.read().df.get(term).copied().unwrap_or(0)
    }

    /// Inverse document frequency of a term; always non-negative.
    pub fn idf(&self, term: &str) -> f64 {
        idf(&self.state.read(), term)
    }
}

fn idf(state: &Bm25State, term: &str) -> f64 {
    let df = state.df.get(term).copied().unwrap_or(0) as f64;
    let n = state.doc_count as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}
