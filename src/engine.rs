// src/engine.rs
//! Feed engine: ties the pattern, its demand table and the provider clients
//! together. Built once at startup and shared read-only by every request.

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::assemble::assemble;
use crate::content::ContentItem;
use crate::demand::DemandTable;
use crate::fetch::{fetch_all, FetchOptions, ProviderRegistry};
use crate::mix::MixingPattern;

pub struct FeedEngine {
    pattern: MixingPattern,
    table: DemandTable,
    providers: ProviderRegistry,
    fetch: FetchOptions,
}

impl FeedEngine {
    /// Fails when the pattern names a provider without a registered client.
    pub fn new(pattern: MixingPattern, providers: ProviderRegistry) -> Result<Self> {
        let missing: Vec<String> = pattern
            .providers()
            .into_iter()
            .filter(|p| !providers.contains_key(p))
            .map(|p| p.to_string())
            .collect();
        if !missing.is_empty() {
            bail!("mixing pattern references unknown providers: {}", missing.join(", "));
        }

        for (id, client) in &providers {
            debug!(provider = %id, client = client.name(), "provider registered");
        }

        let table = DemandTable::build(&pattern);
        info!(
            slots = pattern.len(),
            providers = providers.len(),
            per_cycle = ?table.per_cycle(),
            "feed engine ready"
        );

        Ok(Self {
            pattern,
            table,
            providers,
            fetch: FetchOptions::default(),
        })
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch.timeout = timeout;
        self
    }

    /// Zero is treated as one so every provider can still contribute.
    pub fn with_max_fetch_items(mut self, max_items: usize) -> Self {
        self.fetch.max_items = max_items.max(1);
        self
    }

    pub fn pattern(&self) -> &MixingPattern {
        &self.pattern
    }

    /// Serve `count` feed positions starting at `offset` for `user`.
    pub async fn window(&self, count: usize, offset: usize, user: &str) -> Vec<ContentItem> {
        let demand = self.table.demand(count, offset);
        let queues = fetch_all(&demand, user, &self.providers, &self.fetch).await;
        assemble(count, offset, &self.pattern, queues)
    }
}
