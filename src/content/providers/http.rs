// src/content/providers/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::content::types::{ContentItem, ContentProvider, ProviderId};

/// Upstream that speaks the same wire format as this service:
/// `GET {url}?count=N` answering with a JSON array of items.
pub struct HttpProvider {
    id: ProviderId,
    url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(id: impl Into<ProviderId>, url: impl Into<String>) -> Self {
        Self::with_client(id, url, reqwest::Client::new())
    }

    pub fn with_client(
        id: impl Into<ProviderId>,
        url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl ContentProvider for HttpProvider {
    async fn fetch(&self, user: &str, count: usize) -> Result<Vec<ContentItem>> {
        let mut req = self
            .client
            .get(&self.url)
            .query(&[("count", count.to_string()), ("offset", "0".to_string())]);
        if !user.is_empty() {
            req = req.header("x-forwarded-for", user);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("{} http get()", self.id))?
            .error_for_status()
            .with_context(|| format!("{} http status", self.id))?;

        let mut items: Vec<ContentItem> = resp
            .json()
            .await
            .with_context(|| format!("{} http .json()", self.id))?;
        items.truncate(count);
        Ok(items)
    }

    fn name(&self) -> &str {
        self.id.as_str()
    }
}
