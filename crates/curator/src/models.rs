use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw item as produced by the connectors (mailbox, RSS, scrapers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub headline: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
}

fn default_source() -> String {
    "Unknown".to_string()
}

/// A curated news item as it moves through the pipeline. Classification
/// fields stay unset until the batch judgment fills them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub headline: String,
    pub rewritten_headline: Option<String>,
    pub snippet: String,
    pub url: String,
    pub source: String,
    pub date: DateTime<Utc>,
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub is_relevant: Option<bool>,
    #[serde(default)]
    pub confidence: f32,
    pub relevance_reason: Option<String>,
    #[serde(default)]
    pub semantic_score: f32,
    #[serde(default)]
    pub semantic_reason: String,
}

impl NewsItem {
    /// Build a pipeline item from a raw connector item and its cleaned
    /// headline. The id is a content hash of the cleaned headline, so two
    /// items cleaning to the same text collapse to the same id.
    pub fn from_raw(raw: &RawItem, cleaned_headline: String) -> Self {
        Self {
            id: crate::parser::generate_id(&cleaned_headline),
            headline: cleaned_headline,
            rewritten_headline: None,
            snippet: raw.snippet.trim().to_string(),
            url: raw.url.clone(),
            source: raw.source.clone(),
            date: raw.date,
            section: None,
            subsection: None,
            is_relevant: None,
            confidence: 0.0,
            relevance_reason: None,
            semantic_score: 0.0,
            semantic_reason: String::new(),
        }
    }
}

/// A per-item decision record returned by the classification capability.
/// Fields the model forgets to emit decode to safe defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub is_relevant: bool,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub subsection: Option<String>,
    #[serde(default)]
    pub rewritten_headline: Option<String>,
}

/// Complete output of one curation run, for serialization to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurationOutput {
    pub version: String,
    pub created_at: String,
    pub accepted: Vec<NewsItem>,
    pub rejected: Vec<NewsItem>,
}

impl CurationOutput {
    pub fn new(accepted: Vec<NewsItem>, rejected: Vec<NewsItem>) -> Self {
        Self {
            version: "1.0".to_string(),
            created_at: Utc::now().to_rfc3339(),
            accepted,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_defaults() {
        let raw: RawItem =
            serde_json::from_str(r#"{"headline": "Singtel expands in Thailand"}"#).unwrap();
        assert_eq!(raw.source, "Unknown");
        assert_eq!(raw.snippet, "");
        assert_eq!(raw.url, "");
    }

    #[test]
    fn test_decision_defaults_missing_fields() {
        let dec: Decision = serde_json::from_str(r#"{"is_relevant": true}"#).unwrap();
        assert!(dec.is_relevant);
        assert_eq!(dec.confidence, 0.0);
        assert_eq!(dec.subsection, None);
        assert_eq!(dec.rewritten_headline, None);
    }

    #[test]
    fn test_same_cleaned_headline_same_id() {
        let raw_a = RawItem {
            headline: "ignored".to_string(),
            snippet: String::new(),
            url: "https://a.example.com".to_string(),
            source: "A".to_string(),
            date: Utc::now(),
        };
        let raw_b = RawItem {
            url: "https://b.example.com".to_string(),
            source: "B".to_string(),
            ..raw_a.clone()
        };

        let a = NewsItem::from_raw(&raw_a, "Singapore exports slump.".to_string());
        let b = NewsItem::from_raw(&raw_b, "Singapore exports slump.".to_string());
        assert_eq!(a.id, b.id);
    }
}
