use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunking parameters. The engine consumes ready-made chunks; these
/// values are carried for the external chunker's benefit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub size: usize,
    pub overlap: usize,
    pub min_size: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            size: defaults::DEFAULT_CHUNK_SIZE,
            overlap: defaults::DEFAULT_CHUNK_OVERLAP,
            min_size: defaults::DEFAULT_CHUNK_MIN_SIZE,
        }
    }
}
