//! # fathom-runtime
//!
//! Shared execution primitives for the engine: a fixed-size worker pool
//! backing asynchronous queries, the bounded LRU result cache, and the
//! background auto-tuner.

pub mod cache;
pub mod pool;
pub mod tuner;

pub use cache::LruCache;
pub use pool::{TaskHandle, WorkerPool};
pub use tuner::{AutoTuner, TunerParams};
