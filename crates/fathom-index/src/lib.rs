//! # fathom-index
//!
//! The in-memory retrieval tier: multilingual tokenizer, BM25 inverted
//! index, flat vector store, and the fusion retriever that combines
//! lexical and semantic rankings.

pub mod bm25;
pub mod embedding;
pub mod fusion;
pub mod tokenizer;
pub mod vector;

pub use bm25::Bm25Index;
pub use embedding::HashedEmbedding;
pub use fusion::{FusionRetriever, FusionStrategy};
pub use tokenizer::{Language, Tokenizer};
pub use vector::FlatVectorStore;
