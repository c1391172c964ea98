//! Property tests: insert counting, id lookup, and blob stability.

use proptest::prelude::*;

use fathom_core::config::StoreConfig;
use fathom_core::Chunk;
use fathom_store::StoreEngine;

fn scan_config() -> StoreConfig {
    StoreConfig {
        vector_extension: "scan".to_string(),
        ..Default::default()
    }
}

proptest! {
    // SQLite startup per case is not free; keep the case count modest.
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn insert_increases_total_chunks_by_batch_len(
        texts in proptest::collection::vec("[a-z ]{1,40}", 1..12),
    ) {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        let before = engine.stats().unwrap().total_chunks;

        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new("doc", i as u32, t.clone()))
            .collect();
        let ids = engine.insert_chunks(&chunks, None).unwrap();

        let after = engine.stats().unwrap().total_chunks;
        prop_assert_eq!(after - before, chunks.len());
        prop_assert_eq!(ids.len(), chunks.len());
    }

    #[test]
    fn chunks_by_ids_returns_at_most_the_stored_rows(
        count in 1usize..10,
        extra_ids in proptest::collection::vec(1000i64..2000, 0..5),
    ) {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        let chunks: Vec<Chunk> = (0..count)
            .map(|i| Chunk::new("doc", i as u32, format!("content {i}")))
            .collect();
        let mut ids = engine.insert_chunks(&chunks, None).unwrap();
        ids.extend(extra_ids);

        let rows = engine.chunks_by_ids(&ids).unwrap();
        prop_assert_eq!(rows.len(), count);
    }

    #[test]
    fn double_ingest_doubles_the_count(
        count in 1usize..8,
    ) {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        let chunks: Vec<Chunk> = (0..count)
            .map(|i| Chunk::new("doc", i as u32, format!("content {i}")))
            .collect();
        engine.insert_chunks(&chunks, None).unwrap();
        engine.insert_chunks(&chunks, None).unwrap();
        prop_assert_eq!(engine.stats().unwrap().total_chunks, 2 * count);
    }
}
