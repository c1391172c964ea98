//! # fathom-retrieval
//!
//! The retrieval layers above the raw stores: a caching, strategy-aware
//! retriever over the persistent index, and the hybrid coordinator that
//! manages the memory and persistent tiers together.

pub mod coordinator;
pub mod store_retriever;
pub mod strategy;

pub use coordinator::{HybridEngine, HybridStats};
pub use store_retriever::{StoreRetriever, StoreRetrieverConfig};
pub use strategy::RetrievalStrategy;
