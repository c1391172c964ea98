//! Configuration loading against real files.

use fathom_core::config::RagConfig;

#[test]
fn full_file_round_trips_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rag_config.toml");
    std::fs::write(
        &path,
        r#"
        [chunk]
        size = 256
        overlap = 64
        min_size = 32

        [bm25]
        k1 = 1.2
        b = 0.6

        [hnsw]
        M = 32
        ef_construction = 100
        ef_query = 40
        vector_dim = 384
        max_elements = 5000

        [fusion]
        strategy = "rrf"
        bm25_weight = 0.7
        vector_weight = 0.3
        max_candidates = 50
        rrf_k = 30.0
        enable_rerank = false

        [cache]
        capacity = 16
        ttl_seconds = 60

        [threadpool]
        num_workers = 2

        [tuner]
        enable = false
        latency_max_ms = 150.0
        recall_min_pct = 0.9
        ef_delta = 10
        topk_delta = 1
        check_interval_seconds = 5

        [sqlite]
        db_path = "corpus.db"
        vector_extension = "scan"
        vector_dimension = 384
        enable_fts5 = true
        enable_wal = false
        cache_size = 2000
        busy_timeout = 1000
        fts5_limit = 20
        vector_limit = 20
        "#,
    )
    .unwrap();

    let config = RagConfig::load(&path).unwrap();
    assert_eq!(config.chunk.size, 256);
    assert_eq!(config.bm25.k1, 1.2);
    assert_eq!(config.hnsw.m, 32);
    assert_eq!(config.hnsw.vector_dim, 384);
    assert_eq!(config.fusion.strategy, "rrf");
    assert!(!config.fusion.enable_rerank);
    assert_eq!(config.cache.capacity, 16);
    assert_eq!(config.threadpool.num_workers, 2);
    assert!(!config.tuner.enable);
    assert_eq!(config.sqlite.db_path, "corpus.db");
    assert!(config.sqlite.uses_builtin_scan());
    assert_eq!(config.sqlite.fts5_limit, 20);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = RagConfig::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.sqlite.db_path, "rag_store.db");
    assert_eq!(config.fusion.strategy, "hybrid");
}
