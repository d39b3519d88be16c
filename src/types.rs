//! Search results as handed to the evaluator by upstream providers.

use serde::{Deserialize, Serialize};

/// One candidate document from a provider's ranked result list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Provider-side identifier (ignored by the evaluator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Result title.
    pub title: String,
    /// Description or passage text shown to the judge.
    #[serde(default, alias = "snippet")]
    pub description: String,
    /// Document locator, appended to the passage as context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upstream relevance score (provider specific, ignored by the evaluator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ResultItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_snippet_alias() {
        let json = r#"{"title": "Pricing", "snippet": "Plans start at $20", "url": "https://vercel.com/pricing", "score": 0.91}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.title, "Pricing");
        assert_eq!(item.description, "Plans start at $20");
        assert_eq!(item.url.as_deref(), Some("https://vercel.com/pricing"));
        assert_eq!(item.score, Some(0.91));
    }

    #[test]
    fn test_minimal_item() {
        let item: ResultItem = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert!(item.description.is_empty());
        assert!(item.url.is_none());
    }
}
