// src/config.rs
//! Service configuration: which providers exist and how they are blended.
//!
//! Lookup order:
//! 1) `$FEED_CONFIG_PATH`
//! 2) `config/feed.toml`
//! 3) built-in default (three sample providers, 8-slot blend)

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::content::providers::{http::HttpProvider, sample::SampleProvider};
use crate::content::{ContentProvider, ProviderId};
use crate::engine::FeedEngine;
use crate::fetch::{ProviderRegistry, DEFAULT_MAX_FETCH_ITEMS};
use crate::mix::{MixingPattern, SlotSpec};

pub const ENV_FEED_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const DEFAULT_FEED_CONFIG_PATH: &str = "config/feed.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Sample,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCfg {
    pub id: ProviderId,
    pub kind: ProviderKind,
    /// Cap per call (sample providers only).
    #[serde(default)]
    pub max_items: Option<usize>,
    /// Upstream endpoint (http providers only).
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Deadline for a single provider call; absent means wait indefinitely.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
    /// Most items requested from one provider per window; defaults to
    /// `DEFAULT_MAX_FETCH_ITEMS`.
    #[serde(default)]
    pub max_fetch_items: Option<usize>,
    pub providers: Vec<ProviderCfg>,
    pub pattern: Vec<SlotSpec>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let providers = ["1", "2", "3"]
            .into_iter()
            .map(|id| ProviderCfg {
                id: id.into(),
                kind: ProviderKind::Sample,
                max_items: None,
                url: None,
            })
            .collect();
        Self {
            fetch_timeout_ms: None,
            max_fetch_items: None,
            providers,
            pattern: MixingPattern::default_blend().slots().to_vec(),
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: FeedConfig = toml::from_str(s).context("parsing feed config toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Env var first, then the default path, then the built-in blend.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_FEED_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_FEED_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_FEED_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        tracing::info!("no feed config found, using built-in blend");
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.pattern.is_empty() {
            bail!("pattern must contain at least one slot");
        }
        if self.max_fetch_items == Some(0) {
            bail!("max_fetch_items must be greater than zero");
        }
        let mut seen = HashSet::new();
        for p in &self.providers {
            if !seen.insert(&p.id) {
                bail!("duplicate provider id {}", p.id);
            }
            if p.kind == ProviderKind::Http && p.url.as_deref().unwrap_or("").is_empty() {
                bail!("http provider {} needs a url", p.id);
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    pub fn max_fetch_items(&self) -> usize {
        self.max_fetch_items.unwrap_or(DEFAULT_MAX_FETCH_ITEMS)
    }

    pub fn build_registry(&self) -> ProviderRegistry {
        let client = reqwest::Client::new();
        self.providers
            .iter()
            .map(|p| {
                let provider: Arc<dyn ContentProvider> = match p.kind {
                    ProviderKind::Sample => match p.max_items {
                        Some(cap) => Arc::new(SampleProvider::capped(p.id.clone(), cap)),
                        None => Arc::new(SampleProvider::new(p.id.clone())),
                    },
                    ProviderKind::Http => Arc::new(HttpProvider::with_client(
                        p.id.clone(),
                        p.url.clone().unwrap_or_default(),
                        client.clone(),
                    )),
                };
                (p.id.clone(), provider)
            })
            .collect()
    }

    pub fn build_engine(&self) -> Result<FeedEngine> {
        let pattern = MixingPattern::new(self.pattern.clone())?;
        Ok(FeedEngine::new(pattern, self.build_registry())?
            .with_fetch_timeout(self.fetch_timeout())
            .with_max_fetch_items(self.max_fetch_items()))
    }
}
