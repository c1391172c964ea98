// Single source of truth for all default values.

// --- Chunking (consumed by the external chunker) ---
pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_CHUNK_OVERLAP: usize = 128;
pub const DEFAULT_CHUNK_MIN_SIZE: usize = 64;

// --- Tokenizer ---
pub const DEFAULT_LOWERCASE: bool = true;
pub const DEFAULT_REMOVE_PUNCTUATION: bool = true;
pub const DEFAULT_FILTER_STOPWORDS: bool = true;
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 1;
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 50;
pub const DEFAULT_CHINESE_SEGMENTATION: bool = true;
pub const DEFAULT_KEEP_SINGLE_CHAR: bool = false;

// --- BM25 ---
pub const DEFAULT_BM25_K1: f64 = 1.5;
pub const DEFAULT_BM25_B: f64 = 0.75;

// --- Vector store (HNSW-shaped knobs; the flat reference backend ignores M/ef) ---
pub const DEFAULT_HNSW_M: usize = 16;
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;
pub const DEFAULT_EF_QUERY: usize = 50;
pub const DEFAULT_VECTOR_DIM: usize = 768;
pub const DEFAULT_MAX_ELEMENTS: usize = 10_000;

// --- Fusion ---
pub const DEFAULT_FUSION_STRATEGY: &str = "hybrid";
pub const DEFAULT_BM25_WEIGHT: f64 = 0.5;
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.5;
pub const DEFAULT_MAX_CANDIDATES: usize = 100;
pub const DEFAULT_RRF_K: f64 = 60.0;
pub const DEFAULT_ENABLE_RERANK: bool = true;

// --- Result cache ---
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

// --- Worker pool ---
pub const DEFAULT_NUM_WORKERS: usize = 8;

// --- Auto-tuner ---
pub const DEFAULT_TUNER_ENABLE: bool = true;
pub const DEFAULT_LATENCY_MAX_MS: f64 = 200.0;
pub const DEFAULT_RECALL_MIN_PCT: f64 = 0.8;
pub const DEFAULT_EF_DELTA: i64 = 5;
pub const DEFAULT_TOPK_DELTA: i64 = 2;
pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 10;

// --- SQLite persistent store ---
pub const DEFAULT_DB_PATH: &str = "rag_store.db";
pub const DEFAULT_VECTOR_EXTENSION: &str = "sqlite_vec";
pub const DEFAULT_VECTOR_DIMENSION: usize = 768;
pub const DEFAULT_ENABLE_FTS5: bool = true;
pub const DEFAULT_ENABLE_WAL: bool = true;
pub const DEFAULT_SQLITE_CACHE_SIZE: i64 = 10_000;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;
pub const DEFAULT_FTS5_LIMIT: usize = 50;
pub const DEFAULT_VECTOR_LIMIT: usize = 50;
pub const DEFAULT_MMAP_SIZE: u64 = 268_435_456; // 256 MiB

// --- Persistent retriever ---
pub const DEFAULT_FTS5_WEIGHT: f64 = 0.6;
pub const DEFAULT_PERSISTENT_VECTOR_WEIGHT: f64 = 0.4;
pub const DEFAULT_MAX_RESULTS: usize = 10;

// --- Hybrid coordinator ---
pub const DEFAULT_HOT_THRESHOLD: u32 = 3;
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;
