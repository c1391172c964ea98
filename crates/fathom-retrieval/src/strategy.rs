//! Retrieval strategy selection for the persistent tier.

use std::sync::OnceLock;

use regex::Regex;

use fathom_core::errors::IndexError;

/// How a persistent-tier query is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    FtsOnly,
    VectorOnly,
    Hybrid,
    /// Pick per query via [`choose_strategy`].
    Adaptive,
}

impl RetrievalStrategy {
    /// Parse the shared `[fusion] strategy` value for this tier.
    /// `rrf` and `weighted` fold into the hybrid merge here; unknown
    /// values are rejected.
    pub fn parse(value: &str) -> Result<Self, IndexError> {
        match value {
            "bm25_only" => Ok(Self::FtsOnly),
            "vector_only" => Ok(Self::VectorOnly),
            "hybrid" | "rrf" | "weighted" => Ok(Self::Hybrid),
            "adaptive" => Ok(Self::Adaptive),
            other => Err(IndexError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }

    /// Stable ordinal used in cache-key fingerprints.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::FtsOnly => 0,
            Self::VectorOnly => 1,
            Self::Hybrid => 2,
            Self::Adaptive => 3,
        }
    }
}

/// Adaptive heuristic: short keyword-dense queries go to full-text,
/// long queries to vector search, everything else hybrid. A pure
/// function of the query text.
pub fn choose_strategy(query: &str) -> RetrievalStrategy {
    let english_words = english_word_count(query);
    if query.len() < 50 && english_words > 2 {
        RetrievalStrategy::FtsOnly
    } else if query.len() > 100 {
        RetrievalStrategy::VectorOnly
    } else {
        RetrievalStrategy::Hybrid
    }
}

fn english_word_count(query: &str) -> usize {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b[a-zA-Z]+\b").expect("static pattern"))
        .find_iter(query)
        .count()
}
