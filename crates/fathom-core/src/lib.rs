//! # fathom-core
//!
//! Foundation crate for the fathom retrieval engine.
//! Defines the chunk and result models, errors, configuration, and traits.
//! Every other crate in the workspace depends on this.

pub mod chunk;
pub mod config;
pub mod errors;
pub mod result;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use chunk::Chunk;
pub use config::RagConfig;
pub use errors::{FathomError, FathomResult};
pub use result::{ResultSource, RetrievalResult, StoredChunk};
