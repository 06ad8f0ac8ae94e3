// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod assemble;
pub mod config;
pub mod content;
pub mod demand;
pub mod engine;
pub mod fetch;
pub mod metrics;
pub mod mix;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::content::{ContentItem, ContentProvider, ProviderId};
pub use crate::engine::FeedEngine;
pub use crate::mix::{MixingPattern, SlotSpec};

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the full in-process app: config -> engine -> router.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = config::FeedConfig::load_default()?;
    let engine = cfg.build_engine()?;
    info!(
        providers = cfg.providers.len(),
        slots = cfg.pattern.len(),
        timeout_ms = ?cfg.fetch_timeout_ms,
        "feed config loaded"
    );
    Ok(router(Arc::new(engine)))
}

/// Compact console logs for local runs.
/// Activation requires FEED_DEV_LOG=1; a no-op when a subscriber is already set.
pub fn init_dev_tracing() {
    let on = std::env::var("FEED_DEV_LOG").ok().is_some_and(|v| v == "1");
    if !on {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed_blender=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
