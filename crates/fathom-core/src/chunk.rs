//! Input unit of the engine: a text span with identity `(doc_id, seq_no)`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A corpus chunk as handed to the engine by the (external) chunker.
///
/// Identity is `(doc_id, seq_no)`. Duplicate identities are allowed at
/// ingestion; fusion collapses them to a single candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Non-empty chunk text.
    pub text: String,
    /// Owning document id.
    pub doc_id: String,
    /// Position of this chunk within the document.
    pub seq_no: u32,
    /// Topic label, may be empty.
    #[serde(default)]
    pub topic: String,
    /// Language hint: `"zh"`, `"en"`, or empty for auto-detection.
    #[serde(default)]
    pub language: String,
    /// Epoch seconds at creation.
    #[serde(default)]
    pub created_at: i64,
}

impl Chunk {
    /// Build a chunk stamped with the current time.
    pub fn new(doc_id: impl Into<String>, seq_no: u32, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc_id: doc_id.into(),
            seq_no,
            topic: String::new(),
            language: String::new(),
            created_at: Utc::now().timestamp(),
        }
    }

    /// Attach a topic label.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Attach a language hint (`"zh"` or `"en"`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// De-duplication key used by every fusion and merge path.
    pub fn doc_key(&self) -> String {
        format!("{}_{}", self.doc_id, self.seq_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_key_combines_id_and_seq() {
        let chunk = Chunk::new("d1", 3, "some text");
        assert_eq!(chunk.doc_key(), "d1_3");
    }

    #[test]
    fn builder_sets_topic_and_language() {
        let chunk = Chunk::new("d1", 0, "text")
            .with_topic("ml")
            .with_language("en");
        assert_eq!(chunk.topic, "ml");
        assert_eq!(chunk.language, "en");
        assert!(chunk.created_at > 0);
    }
}
