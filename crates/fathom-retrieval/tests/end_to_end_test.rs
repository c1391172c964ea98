//! End-to-end retrieval scenarios across both tiers.

use std::sync::Arc;

use fathom_core::config::RagConfig;
use fathom_core::{Chunk, ResultSource};
use fathom_index::{FusionRetriever, HashedEmbedding};
use fathom_runtime::WorkerPool;
use fathom_store::{StoreEngine, VectorCapability};
use fathom_retrieval::{HybridEngine, StoreRetriever};

const DIM: usize = 128;

fn rag_config() -> RagConfig {
    let mut config = RagConfig::default();
    config.hnsw.vector_dim = DIM;
    config.sqlite.vector_extension = "scan".to_string();
    config.sqlite.vector_dimension = DIM;
    config.threadpool.num_workers = 2;
    config
}

fn english_corpus() -> Vec<Chunk> {
    vec![
        Chunk::new("d1", 0, "machine learning automates analytical model building"),
        Chunk::new("d2", 0, "deep learning uses neural networks with multiple layers"),
        Chunk::new("d3", 0, "AI applications include computer vision"),
        Chunk::new("d4", 0, "the cat sat on the mat"),
    ]
}

fn chinese_corpus() -> Vec<Chunk> {
    vec![
        Chunk::new("c1", 0, "机器学习是一种数据分析方法").with_language("zh"),
        Chunk::new("c2", 0, "深度学习是机器学习的一个子领域").with_language("zh"),
        Chunk::new("c3", 0, "自然语言处理是计算机科学分支").with_language("zh"),
    ]
}

fn store_retriever(config: &RagConfig) -> Arc<StoreRetriever> {
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

// Scenario: English lexical retrieval through the memory tier.
#[test]
fn english_lexical_retrieval_ranks_by_term_match() {
    let mut config = rag_config();
    config.fusion.strategy = "bm25_only".to_string();
    let pool = Arc::new(WorkerPool::new(&config.threadpool));
    let retriever = FusionRetriever::from_config(&config, pool).unwrap();
    retriever.fit(&english_corpus());

    let results = retriever.query("machine learning", 2).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, "d1");
    assert_eq!(results[1].doc_id, "d2");
    assert!(results.iter().all(|r| r.doc_id != "d4"));
}

// Scenario: Chinese lexical retrieval with dictionary segmentation.
#[test]
fn chinese_lexical_retrieval_finds_both_mentions() {
    let mut config = rag_config();
    config.fusion.strategy = "bm25_only".to_string();
    let pool = Arc::new(WorkerPool::new(&config.threadpool));
    let retriever = FusionRetriever::from_config(&config, pool).unwrap();
    retriever.fit(&chinese_corpus());

    let results = retriever.query("机器学习", 2).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.doc_id.as_str()).collect();
    assert!(ids.contains(&"c1"));
    assert!(ids.contains(&"c2"));
    assert!(!ids.contains(&"c3"));
}

// Scenario: cache hit on the persistent tier returns identical ids.
#[test]
fn repeated_query_hits_the_result_cache() {
    let config = rag_config();
    let retriever = store_retriever(&config);
    retriever
        .insert_documents(&[english_corpus(), chinese_corpus()].concat())
        .unwrap();

    let first = retriever.query("机器学习", 5).unwrap();
    let (hits_before, _) = retriever.cache_stats();
    assert_eq!(hits_before, 0);

    let second = retriever.query("机器学习", 5).unwrap();
    let (hits_after, _) = retriever.cache_stats();
    assert_eq!(hits_after, 1, "second identical query must hit the cache");

    let first_ids: Vec<i64> = first.iter().map(|r| r.chunk_id).collect();
    let second_ids: Vec<i64> = second.iter().map(|r| r.chunk_id).collect();
    assert_eq!(first_ids, second_ids);
}

// Scenario: hot documents get promoted into the memory tier.
#[test]
fn hot_documents_promote_to_memory_tier() {
    let config = rag_config();
    let engine = Arc::new(StoreEngine::open_in_memory(config.sqlite.clone()).unwrap());
    let hybrid = Arc::new(
        HybridEngine::with_engine(&config, engine, None)
            .unwrap()
            .with_policy(3, 1000),
    );

    // Load through the persistent tier directly so the memory tier
    // starts cold.
    hybrid
        .persistent()
        .insert_documents(&english_corpus())
        .unwrap();
    assert!(hybrid.memory_resident_docs().is_empty());

    for _ in 0..3 {
        let results = hybrid.search("deep learning", 2).unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.source == Some(ResultSource::Persistent)));
    }

    // The search path also schedules optimization in the background;
    // the explicit call is a no-op if that already ran.
    hybrid.optimize_data_distribution().unwrap();
    assert!(hybrid.memory_resident_docs().contains("d2"));

    let results = hybrid.search("deep learning", 2).unwrap();
    assert!(
        results.iter().any(|r| r.source == Some(ResultSource::Memory)),
        "post-promotion results should come from the memory tier"
    );

    // Promoting an already-resident document is a no-op.
    let resident_before = hybrid.memory_resident_docs();
    hybrid.optimize_data_distribution().unwrap();
    assert_eq!(hybrid.memory_resident_docs(), resident_before);
}

// Scenario: unavailable vector extension degrades to text-only.
#[test]
fn degraded_vector_extension_serves_text_only() {
    let mut config = rag_config();
    config.sqlite.vector_extension = "no_such_vector_extension".to_string();

    let engine = Arc::new(StoreEngine::open_in_memory(config.sqlite.clone()).unwrap());
    assert_eq!(engine.vector_capability(), VectorCapability::Degraded);

    let pool = Arc::new(WorkerPool::new(&config.threadpool));
    let retriever = StoreRetriever::new(
        &config,
        engine,
        Some(Arc::new(HashedEmbedding::new(DIM))),
        pool,
    )
    .unwrap();
    retriever.insert_documents(&english_corpus()[..3]).unwrap();

    // Vector-only yields an empty list, not a failure.
    assert!(retriever.query_vector_only("x", 5).unwrap().is_empty());

    // Hybrid collapses to the FTS-only results.
    let hybrid = retriever.query_hybrid("machine learning", 5).unwrap();
    let text_only = retriever.query_text_only("machine learning", 5).unwrap();
    let hybrid_ids: Vec<i64> = hybrid.iter().map(|r| r.chunk_id).collect();
    let text_ids: Vec<i64> = text_only.iter().map(|r| r.chunk_id).collect();
    assert_eq!(hybrid_ids, text_ids);
}

// Boundary: empty corpus answers queries with empty lists, not errors.
#[test]
fn empty_corpus_returns_empty_everywhere() {
    let config = rag_config();
    let retriever = store_retriever(&config);
    assert!(retriever.query("anything at all", 10).unwrap().is_empty());
    assert!(retriever.query_text_only("anything", 10).unwrap().is_empty());
    assert!(retriever.query_vector_only("anything", 10).unwrap().is_empty());
}

// Boundary: zero limit short-circuits to an empty answer.
#[test]
fn zero_limit_returns_empty() {
    let config = rag_config();
    let retriever = store_retriever(&config);
    retriever.insert_documents(&english_corpus()).unwrap();
    assert!(retriever.query("machine learning", 0).unwrap().is_empty());
}

// Async entry points resolve to the same answer as the sync path.
#[test]
fn async_query_matches_sync_query() {
    let config = rag_config();
    let retriever = store_retriever(&config);
    retriever.insert_documents(&english_corpus()).unwrap();

    let sync_ids: Vec<i64> = retriever
        .query("machine learning", 3)
        .unwrap()
        .iter()
        .map(|r| r.chunk_id)
        .collect();
    let handle = StoreRetriever::query_async(&retriever, "machine learning", 3);
    let async_ids: Vec<i64> = handle
        .join()
        .unwrap()
        .unwrap()
        .iter()
        .map(|r| r.chunk_id)
        .collect();
    assert_eq!(sync_ids, async_ids);
}
