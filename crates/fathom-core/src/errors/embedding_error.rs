/// Embedding provider errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding failed: {reason}")]
    Failed { reason: String },

    #[error("provider returned an empty vector")]
    Empty,
}
