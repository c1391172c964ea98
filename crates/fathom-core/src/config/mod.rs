//! Engine configuration.
//!
//! Loaded from a TOML file; every section and key has a default, so a
//! missing file or partial file is always usable. Unknown sections and
//! keys are ignored with a warning. The loader returns a plain value —
//! there is no process-global configuration.

pub mod defaults;

mod chunk_config;
mod fusion_config;
mod index_config;
mod runtime_config;
mod store_config;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{FathomError, FathomResult};

pub use chunk_config::ChunkConfig;
pub use fusion_config::FusionConfig;
pub use index_config::{Bm25Config, HnswConfig, TokenizerConfig};
pub use runtime_config::{CacheConfig, ThreadPoolConfig, TunerConfig};
pub use store_config::StoreConfig;

/// Recognized sections and their keys; anything else draws a warning.
const KNOWN_SECTIONS: &[(&str, &[&str])] = &[
    ("chunk", &["size", "overlap", "min_size"]),
    (
        "tokenizer",
        &[
            "lowercase",
            "remove_punctuation",
            "filter_stopwords",
            "min_token_length",
            "max_token_length",
            "enable_chinese_segmentation",
            "keep_single_char",
        ],
    ),
    ("bm25", &["k1", "b"]),
    (
        "hnsw",
        &["M", "ef_construction", "ef_query", "vector_dim", "max_elements"],
    ),
    (
        "fusion",
        &[
            "strategy",
            "bm25_weight",
            "vector_weight",
            "max_candidates",
            "rrf_k",
            "enable_rerank",
        ],
    ),
    ("cache", &["capacity", "ttl_seconds"]),
    ("threadpool", &["num_workers"]),
    (
        "tuner",
        &[
            "enable",
            "latency_max_ms",
            "recall_min_pct",
            "ef_delta",
            "topk_delta",
            "check_interval_seconds",
        ],
    ),
    (
        "sqlite",
        &[
            "db_path",
            "vector_extension",
            "vector_dimension",
            "enable_fts5",
            "enable_wal",
            "cache_size",
            "busy_timeout",
            "fts5_limit",
            "vector_limit",
        ],
    ),
];

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub chunk: ChunkConfig,
    pub tokenizer: TokenizerConfig,
    pub bm25: Bm25Config,
    pub hnsw: HnswConfig,
    pub fusion: FusionConfig,
    pub cache: CacheConfig,
    pub threadpool: ThreadPoolConfig,
    pub tuner: TunerConfig,
    pub sqlite: StoreConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file falls back to defaults; a malformed file is an
    /// error. Unknown sections/keys are logged and ignored.
    pub fn load(path: impl AsRef<Path>) -> FathomResult<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                info!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
        };
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> FathomResult<Self> {
        let value: toml::Value = toml::from_str(text).map_err(|e| FathomError::Config {
            reason: e.to_string(),
        })?;
        warn_unknown_keys(&value);
        value.try_into().map_err(|e: toml::de::Error| FathomError::Config {
            reason: e.to_string(),
        })
    }
}

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else { return };
    for (section, entry) in table {
        match KNOWN_SECTIONS.iter().find(|(name, _)| *name == section.as_str()) {
            None => warn!(section = %section, "ignoring unknown config section"),
            Some((_, keys)) => {
                if let Some(section_table) = entry.as_table() {
                    for key in section_table.keys() {
                        if !keys.contains(&key.as_str()) {
                            warn!(section = %section, key = %key, "ignoring unknown config key");
                        }
                    }
                }
            }
        }
    }
}
