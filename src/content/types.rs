// src/content/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque identifier of an upstream content source (e.g. "1", "news", "video").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One piece of content fetched from a provider.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub source: ProviderId,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub link: String,
    pub expiry: DateTime<Utc>, // RFC 3339 on the wire
}

/// Client capability of a single upstream provider.
///
/// Implementations may return fewer than `count` items; that is a normal
/// outcome, not an error.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch(&self, user: &str, count: usize) -> Result<Vec<ContentItem>>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn item_serializes_with_plain_source_and_iso_expiry() {
        let item = ContentItem {
            id: "42".into(),
            title: "title".into(),
            source: ProviderId::new("1"),
            summary: String::new(),
            link: "https://example.com/42".into(),
            expiry: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["source"], "1");
        assert_eq!(v["expiry"], "2024-05-01T12:00:00Z");
        assert_eq!(v["link"], "https://example.com/42");
    }

    #[test]
    fn provider_id_orders_lexically() {
        let mut ids = vec![ProviderId::new("3"), "1".into(), "2".into()];
        ids.sort();
        assert_eq!(ids, vec!["1".into(), "2".into(), ProviderId::new("3")]);
    }
}
