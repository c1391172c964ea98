use serde::{Deserialize, Serialize};

use super::defaults;

/// Bounded result-cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    /// `0` disables expiry.
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_CACHE_CAPACITY,
            ttl_seconds: defaults::DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

/// Worker pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolConfig {
    pub num_workers: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_workers: defaults::DEFAULT_NUM_WORKERS,
        }
    }
}

/// Auto-tuner thresholds and step sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    pub enable: bool,
    pub latency_max_ms: f64,
    pub recall_min_pct: f64,
    pub ef_delta: i64,
    pub topk_delta: i64,
    pub check_interval_seconds: u64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            enable: defaults::DEFAULT_TUNER_ENABLE,
            latency_max_ms: defaults::DEFAULT_LATENCY_MAX_MS,
            recall_min_pct: defaults::DEFAULT_RECALL_MIN_PCT,
            ef_delta: defaults::DEFAULT_EF_DELTA,
            topk_delta: defaults::DEFAULT_TOPK_DELTA,
            check_interval_seconds: defaults::DEFAULT_CHECK_INTERVAL_SECONDS,
        }
    }
}
