/// In-memory index errors (BM25, vector store, fusion).
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("unknown fusion strategy: {value}")]
    UnknownStrategy { value: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index queried before fit")]
    NotFitted,
}
