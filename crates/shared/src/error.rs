use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Failure body returned alongside a non-2xx status.
///
/// Only a string `detail` is meaningful to the client. Validation failures
/// from the backend carry a list instead, which decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "string_or_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    /// The detail message, if present and not blank.
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .filter(|detail| !detail.trim().is_empty())
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(detail) => Some(detail),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_detail() {
        let body = ErrorBody::from_slice(br#"{"detail":"vector store unavailable"}"#)
            .expect("json body");
        assert_eq!(body.message(), Some("vector store unavailable"));
    }

    #[test]
    fn list_detail_counts_as_absent() {
        let body = ErrorBody::from_slice(br#"{"detail":[{"loc":["body","question"]}]}"#)
            .expect("json body");
        assert_eq!(body.message(), None);
    }

    #[test]
    fn blank_detail_counts_as_absent() {
        let body = ErrorBody::from_slice(br#"{"detail":"   "}"#).expect("json body");
        assert_eq!(body.message(), None);
        assert_eq!(ErrorBody::from_slice(b"{}").and_then(|b| b.detail), None);
    }

    #[test]
    fn non_json_body_is_rejected() {
        assert!(ErrorBody::from_slice(b"<html>502 Bad Gateway</html>").is_none());
    }
}
