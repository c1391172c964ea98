//! Object-safe traits at the seams between engine components.

mod embedding;
mod vector_store;

pub use embedding::{EmbedKind, IEmbeddingProvider};
pub use vector_store::{IVectorStore, VectorHit, VectorRecord};
