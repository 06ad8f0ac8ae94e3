// src/content/providers/sample.rs
//! In-process provider that fabricates items. Used for the default deployment
//! and for tests; `max_items` models an upstream that runs dry.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::content::types::{ContentItem, ContentProvider, ProviderId};

pub struct SampleProvider {
    source: ProviderId,
    max_items: Option<usize>,
}

impl SampleProvider {
    pub fn new(source: impl Into<ProviderId>) -> Self {
        Self {
            source: source.into(),
            max_items: None,
        }
    }

    /// Never return more than `cap` items per call.
    pub fn capped(source: impl Into<ProviderId>, cap: usize) -> Self {
        Self {
            source: source.into(),
            max_items: Some(cap),
        }
    }
}

#[async_trait]
impl ContentProvider for SampleProvider {
    async fn fetch(&self, _user: &str, count: usize) -> Result<Vec<ContentItem>> {
        let n = self.max_items.map_or(count, |cap| count.min(cap));
        let expiry = Utc::now() + Duration::hours(1);
        let items = (0..n)
            .map(|_| {
                let id = rand::random::<u64>() >> 1; // keep it in i64 range
                ContentItem {
                    id: id.to_string(),
                    title: "title".to_string(),
                    source: self.source.clone(),
                    summary: String::new(),
                    link: String::new(),
                    expiry,
                }
            })
            .collect();
        Ok(items)
    }

    fn name(&self) -> &str {
        self.source.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_requested_count_tagged_with_source() {
        let p = SampleProvider::new("2");
        let items = p.fetch("10.0.0.1", 4).await.unwrap();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|it| it.source.as_str() == "2"));
    }

    #[tokio::test]
    async fn cap_limits_supply() {
        let p = SampleProvider::capped("1", 2);
        assert_eq!(p.fetch("", 5).await.unwrap().len(), 2);
        assert_eq!(p.fetch("", 1).await.unwrap().len(), 1);
    }
}
