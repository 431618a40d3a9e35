use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Closed set of mood categories assigned by the remote sentiment scorer.
///
/// Ordered from most to least positive; the client maps these to labels
/// and emoji but never assigns or invents them itself.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MoodCategory {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl MoodCategory {
    pub fn emoji(self) -> &'static str {
        match self {
            MoodCategory::VeryPositive => "😄",
            MoodCategory::Positive => "🙂",
            MoodCategory::Neutral => "😐",
            MoodCategory::Negative => "😔",
            MoodCategory::VeryNegative => "😢",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodCategory::VeryPositive => "very positive",
            MoodCategory::Positive => "positive",
            MoodCategory::Neutral => "neutral",
            MoodCategory::Negative => "negative",
            MoodCategory::VeryNegative => "very negative",
        }
    }
}

/// Sentiment as scored by the remote service. `score` is the compound
/// score in `[-1, 1]`; it may differ between saves of identical text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub mood: MoodCategory,
    #[serde(rename = "compound")]
    pub score: f64,
}

/// A persisted journal entry, owned by the remote store.
///
/// The `key` is the canonical day key (see [`crate::calendar::entry_key`]).
/// It travels as the map key on the wire, so it is skipped during
/// serialization and filled in after deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(skip)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Entry {
    /// An entry "exists" for editing purposes only if its text is
    /// non-blank after trimming.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_categories_round_trip_through_serde() {
        let json = serde_json::to_string(&MoodCategory::VeryPositive).unwrap();
        assert_eq!(json, "\"very_positive\"");
        let back: MoodCategory = serde_json::from_str("\"very_negative\"").unwrap();
        assert_eq!(back, MoodCategory::VeryNegative);
    }

    #[test]
    fn mood_order_runs_most_to_least_positive() {
        assert!(MoodCategory::VeryPositive < MoodCategory::Positive);
        assert!(MoodCategory::Neutral < MoodCategory::VeryNegative);
    }

    #[test]
    fn entry_deserializes_from_server_shape() {
        let json = r#"{
            "text": "A good day.",
            "photos": [],
            "tags": ["walk"],
            "sentiment": {"compound": 0.62, "mood": "positive", "scores": {"positive": 0.4}},
            "themes": ["health"],
            "word_count": 3,
            "updatedAt": "2025-08-25T21:14:03.120000"
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.text, "A good day.");
        assert_eq!(entry.tags, vec!["walk"]);
        let sentiment = entry.sentiment.unwrap();
        assert_eq!(sentiment.mood, MoodCategory::Positive);
        assert!((sentiment.score - 0.62).abs() < f64::EPSILON);
        assert!(entry.updated_at.is_some());
    }

    #[test]
    fn entry_tolerates_missing_fields() {
        let entry: Entry = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert!(entry.photos.is_empty());
        assert!(entry.tags.is_empty());
        assert!(entry.sentiment.is_none());
    }

    #[test]
    fn blank_text_does_not_count_as_existing() {
        let entry: Entry = serde_json::from_str(r#"{"text": "   \n  "}"#).unwrap();
        assert!(!entry.has_text());
    }
}
