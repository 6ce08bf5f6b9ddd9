use serde::{Deserialize, Serialize};

use crate::core::MasonError;

/// State the store cannot represent natively, smuggled through the object's
/// comment slot as a JSON document. The user-facing comment rides along in
/// the same document so nothing is lost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CommentMetadata {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_table: Option<String>,
}

impl CommentMetadata {
    pub fn new(comment: &str, cluster: &str) -> CommentMetadata {
        CommentMetadata {
            comment: comment.to_string(),
            cluster: cluster.to_string(),
            to_table: None,
        }
    }

    /// Serialize for embedding in a single-quoted SQL literal. Quotes are
    /// escaped after marshalling, so the escape applies to the whole
    /// document, comment text included.
    pub fn encode(&self) -> Result<String, MasonError> {
        let marshalled = serde_json::to_string(self)?;
        Ok(marshalled.replace('\'', "\\'"))
    }

    /// Inverse of [`encode`](CommentMetadata::encode): unescape first, then
    /// parse. An empty comment slot decodes to the all-empty metadata, not
    /// an error, since objects created outside this tool have plain (often
    /// empty) comments.
    pub fn decode(raw: &str) -> Result<CommentMetadata, MasonError> {
        if raw.is_empty() {
            return Ok(CommentMetadata::default());
        }
        let unescaped = raw.replace("\\'", "'");
        let metadata = serde_json::from_str(&unescaped)?;
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_emits_compact_json() {
        let metadata = CommentMetadata::new("billing events", "main");
        assert_eq!(
            metadata.encode().unwrap(),
            r#"{"comment":"billing events","cluster":"main"}"#
        );
    }

    #[test]
    fn encode_omits_absent_target_table() {
        let encoded = CommentMetadata::new("", "").encode().unwrap();
        assert!(!encoded.contains("to_table"));
    }

    #[test]
    fn encode_escapes_single_quotes() {
        let metadata = CommentMetadata::new("driver's log", "");
        assert_eq!(
            metadata.encode().unwrap(),
            r#"{"comment":"driver\'s log","cluster":""}"#
        );
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let metadata = CommentMetadata {
            comment: "it's the 'raw' layer".to_string(),
            cluster: "main".to_string(),
            to_table: Some("events_store".to_string()),
        };
        let decoded = CommentMetadata::decode(&metadata.encode().unwrap()).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn decode_empty_yields_empty_metadata() {
        assert_eq!(CommentMetadata::decode("").unwrap(), CommentMetadata::default());
    }

    #[test]
    fn decode_rejects_plain_text() {
        let err = CommentMetadata::decode("just a human comment").unwrap_err();
        assert!(matches!(err, MasonError::MalformedMetadata(_)));
    }

    #[test]
    fn decode_tolerates_missing_fields() {
        let decoded = CommentMetadata::decode(r#"{"comment":"x"}"#).unwrap();
        assert_eq!(decoded.comment, "x");
        assert_eq!(decoded.cluster, "");
        assert_eq!(decoded.to_table, None);
    }
}
