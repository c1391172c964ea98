//! Property tests: the adaptive strategy is a pure function of the
//! query text.

use proptest::prelude::*;

use fathom_retrieval::strategy::{choose_strategy, RetrievalStrategy};

proptest! {
    #[test]
    fn choice_depends_only_on_the_query(query in ".{0,300}") {
        let first = choose_strategy(&query);
        let second = choose_strategy(&query);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn long_queries_always_go_to_vector_search(filler in "[a-z ]{101,300}") {
        prop_assert_eq!(choose_strategy(&filler), RetrievalStrategy::VectorOnly);
    }

    #[test]
    fn chosen_strategy_is_always_concrete(query in ".{0,300}") {
        // The heuristic never returns Adaptive itself.
        prop_assert_ne!(choose_strategy(&query), RetrievalStrategy::Adaptive);
    }
}
