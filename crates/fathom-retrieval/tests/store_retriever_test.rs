//! Persistent retriever behaviors beyond the e2e scenarios.

use std::sync::Arc;

use fathom_core::config::RagConfig;
use fathom_core::Chunk;
use fathom_index::HashedEmbedding;
use fathom_runtime::WorkerPool;
use fathom_store::StoreEngine;
use fathom_retrieval::StoreRetriever;

const DIM: usize = 64;

fn rag_config(strategy: &str) -> RagConfig {
    let mut config = RagConfig::default();
    config.fusion.strategy = strategy.to_string();
    config.hnsw.vector_dim = DIM;
    config.sqlite.vector_extension = "scan".to_string();
    config.sqlite.vector_dimension = DIM;
    config.threadpool.num_workers = 2;
    config
}

fn retriever(config: &RagConfig) -> Arc<StoreRetriever> {
    let engine = Arc::new(StoreEngine::open_in_memory(config.sqlite.clone()).unwrap());
    let pool = Arc::new(WorkerPool::new(&config.threadpool));
    Arc::new(
        StoreRetriever::new(
            config,
            engine,
            Some(Arc::new(HashedEmbedding::new(DIM))),
            pool,
        )
        .unwrap(),
    )
}

fn corpus() -> Vec<Chunk> {
    vec![
        Chunk::new("d1", 0, "machine learning automates analytical model building"),
        Chunk::new("d1", 1, "models are trained on labeled examples"),
        Chunk::new("d2", 0, "deep learning uses neural networks"),
    ]
}

#[test]
fn unknown_strategy_is_a_configuration_error() {
    let config = rag_config("semantic-magic");
    let engine = Arc::new(StoreEngine::open_in_memory(config.sqlite.clone()).unwrap());
    let pool = Arc::new(WorkerPool::with_workers(1));
    assert!(StoreRetriever::new(&config, engine, None, pool).is_err());
}

#[test]
fn adaptive_strategy_serves_all_query_shapes() {
    let config = rag_config("adaptive");
    let retriever = retriever(&config);
    retriever.insert_documents(&corpus()).unwrap();

    // Short keyword query (FTS), long query (vector), medium (hybrid):
    // all shapes answer without failure.
    let short = retriever.query("analytical model building", 5).unwrap();
    assert!(!short.is_empty());

    let long = "please give me a thorough conceptual walkthrough of how deep neural networks learn hierarchical features";
    assert!(long.len() > 100);
    retriever.query(long, 5).unwrap();

    retriever.query("机器学习 overview", 5).unwrap();
}

#[test]
fn warmup_populates_the_cache() {
    let config = rag_config("hybrid");
    let retriever = retriever(&config);
    retriever.insert_documents(&corpus()).unwrap();

    retriever.warmup(&[]);
    let (_, misses) = retriever.cache_stats();
    assert!(misses >= 4, "default warmup set should execute");

    // A warmed query now hits.
    retriever.query("machine learning", 5).unwrap();
    let (hits, _) = retriever.cache_stats();
    assert!(hits >= 1);
}

#[test]
fn insert_invalidates_cached_results() {
    let config = rag_config("hybrid");
    let retriever = retriever(&config);
    retriever.insert_documents(&corpus()).unwrap();

    let before = retriever.query("learning", 10).unwrap();
    retriever
        .insert_documents(&[Chunk::new("d9", 0, "reinforcement learning agents")])
        .unwrap();
    let after = retriever.query("learning", 10).unwrap();
    assert!(after.len() > before.len(), "new rows must be visible after insert");
}

#[test]
fn documents_by_ids_preserves_requested_order() {
    let config = rag_config("hybrid");
    let retriever = retriever(&config);
    retriever.insert_documents(&corpus()).unwrap();

    let all = retriever.query_text_only("learning", 10).unwrap();
    assert!(all.len() >= 2);
    let mut ids: Vec<i64> = all.iter().map(|r| r.chunk_id).collect();
    ids.reverse();

    let rows = retriever.get_documents_by_ids(&ids).unwrap();
    let returned: Vec<i64> = rows.iter().map(|r| r.chunk_id).collect();
    assert_eq!(returned, ids);
}

#[test]
fn clear_all_data_resets_the_corpus() {
    let config = rag_config("hybrid");
    let retriever = retriever(&config);
    retriever.insert_documents(&corpus()).unwrap();
    assert_eq!(retriever.get_stats().unwrap().total_chunks, 3);

    retriever.clear_all_data().unwrap();
    assert_eq!(retriever.get_stats().unwrap().total_chunks, 0);
    assert!(retriever.query("learning", 5).unwrap().is_empty());
}

#[test]
fn duplicate_identity_rows_are_all_returned_by_doc_lookup() {
    let config = rag_config("hybrid");
    let retriever = retriever(&config);
    retriever.insert_documents(&corpus()).unwrap();
    // Re-ingest appends; idempotence is the caller's concern.
    retriever.insert_documents(&corpus()).unwrap();

    let rows = retriever.get_documents_by_doc_id("d1").unwrap();
    assert_eq!(rows.len(), 4);
}
