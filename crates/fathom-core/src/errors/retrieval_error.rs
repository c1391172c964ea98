/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("empty query")]
    EmptyQuery,

    #[error("retriever not initialized: {reason}")]
    NotInitialized { reason: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("background task failed: {reason}")]
    TaskFailed { reason: String },
}
