//! Property tests: tokenizer determinism and BM25 corpus invariants.

use std::collections::HashSet;

use proptest::prelude::*;

use fathom_core::config::Bm25Config;
use fathom_core::Chunk;
use fathom_index::{Bm25Index, Language, Tokenizer};

proptest! {
    #[test]
    fn tokenization_is_deterministic(text in ".{0,200}") {
        let tokenizer = Tokenizer::default();
        let first = tokenizer.tokenize(&text, Language::Auto);
        let second = tokenizer.tokenize(&text, Language::Auto);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn english_tokens_respect_length_bounds(text in "[a-zA-Z ,.!]{0,200}") {
        let tokenizer = Tokenizer::default();
        for token in tokenizer.tokenize(&text, Language::English) {
            let len = token.chars().count();
            prop_assert!((1..=50).contains(&len));
        }
    }

    #[test]
    fn fit_counts_match_corpus(
        texts in proptest::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,10}", 0..16),
    ) {
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new("doc", i as u32, t.clone()))
            .collect();
        let index = Bm25Index::new(&Bm25Config::default());
        index.fit(&chunks);
        prop_assert_eq!(index.doc_count(), chunks.len());
    }

    #[test]
    fn document_frequency_matches_recount(
        texts in proptest::collection::vec("[a-d]{1,3}( [a-d]{1,3}){0,6}", 1..12),
    ) {
        let tokenizer = Tokenizer::default();
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new("doc", i as u32, t.clone()))
            .collect();
        let index = Bm25Index::new(&Bm25Config::default());
        index.fit(&chunks);

        // df(t) must equal the number of chunks whose token set contains t.
        let token_sets: Vec<HashSet<String>> = chunks
            .iter()
            .map(|c| tokenizer.tokenize(&c.text, Language::Auto).into_iter().collect())
            .collect();
        let mut all_terms: HashSet<String> = HashSet::new();
        for set in &token_sets {
            all_terms.extend(set.iter().cloned());
        }
        for term in &all_terms {
            let expected = token_sets.iter().filter(|set| set.contains(term)).count();
            prop_assert_eq!(index.document_frequency(term), expected);
            prop_assert!(index.idf(term) >= 0.0);
        }
    }

    #[test]
    fn query_results_are_bounded_and_sorted(
        texts in proptest::collection::vec("[a-d]{1,3}( [a-d]{1,3}){0,6}", 0..12),
        query in "[a-d]{1,3}( [a-d]{1,3}){0,3}",
        top_k in 0usize..8,
    ) {
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new("doc", i as u32, t.clone()))
            .collect();
        let index = Bm25Index::new(&Bm25Config::default());
        index.fit(&chunks);

        let results = index.query_text(&query, top_k, Language::English);
        prop_assert!(results.len() <= top_k);
        for window in results.windows(2) {
            prop_assert!(window[0].1 >= window[1].1);
        }
    }
}
