//! Model serialization checks.

use fathom_core::{Chunk, ResultSource, RetrievalResult};

#[test]
fn chunk_round_trips_through_json() {
    let chunk = Chunk::new("doc-1", 4, "chunk body")
        .with_topic("ml")
        .with_language("en");
    let json = serde_json::to_string(&chunk).unwrap();
    let back: Chunk = serde_json::from_str(&json).unwrap();
    assert_eq!(back.doc_id, "doc-1");
    assert_eq!(back.seq_no, 4);
    assert_eq!(back.topic, "ml");
    assert_eq!(back.doc_key(), "doc-1_4");
}

#[test]
fn chunk_defaults_fill_missing_fields() {
    let chunk: Chunk = serde_json::from_str(
        r#"{"text": "body", "doc_id": "d", "seq_no": 0}"#,
    )
    .unwrap();
    assert!(chunk.topic.is_empty());
    assert!(chunk.language.is_empty());
}

#[test]
fn result_source_serializes_lowercase() {
    let mut result = RetrievalResult::new("d", 0, 1.0, "text");
    result.source = Some(ResultSource::Memory);
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains(r#""source":"memory""#));

    result.source = Some(ResultSource::Persistent);
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains(r#""source":"persistent""#));
}

#[test]
fn absent_source_is_omitted_from_json() {
    let result = RetrievalResult::new("d", 0, 1.0, "text");
    let json = serde_json::to_string(&result).unwrap();
    assert!(!json.contains("source"));
}
