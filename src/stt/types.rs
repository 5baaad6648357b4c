//! STT (Speech-to-Text) types.

use serde::{Deserialize, Serialize};

/// Outcome of one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Transcription {
    /// Non-empty transcript.
    Recognized(String),
    /// The service understood the request but heard no usable speech.
    Unintelligible,
    /// Quota, network or request failure at the service.
    ServiceError(String),
}

impl Transcription {
    /// Wraps service text, mapping blank transcripts to [`Transcription::Unintelligible`].
    pub fn from_text(text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        if text.is_empty() {
            Transcription::Unintelligible
        } else {
            Transcription::Recognized(text.to_string())
        }
    }

    /// Short label for logs.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Transcription::Recognized(_) => "recognized",
            Transcription::Unintelligible => "unintelligible",
            Transcription::ServiceError(_) => "service_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_unintelligible() {
        assert_eq!(Transcription::from_text("  \n"), Transcription::Unintelligible);
        assert_eq!(
            Transcription::from_text(" salom "),
            Transcription::Recognized("salom".to_string())
        );
    }

    #[test]
    fn labels_name_each_outcome() {
        assert_eq!(Transcription::from_text("a").outcome_label(), "recognized");
        assert_eq!(Transcription::Unintelligible.outcome_label(), "unintelligible");
        assert_eq!(Transcription::ServiceError(String::new()).outcome_label(), "service_error");
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(Transcription::ServiceError("quota".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "service_error", "detail": "quota"}));
    }
}
