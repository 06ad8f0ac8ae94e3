// src/fetch.rs
//! Fetch orchestrator: one concurrent upstream call per provider with
//! non-zero demand, followed by a full barrier.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use metrics::{counter, histogram};
use tracing::warn;

use crate::content::{ContentItem, ContentProvider, ProviderId};
use crate::demand::Demand;

/// Items one provider returned for the current request, consumed front to back.
pub type ProviderQueue = VecDeque<ContentItem>;

pub type Queues = HashMap<ProviderId, ProviderQueue>;

/// Provider clients keyed by the id the mixing pattern refers to them with.
pub type ProviderRegistry = HashMap<ProviderId, Arc<dyn ContentProvider>>;

/// Most items a single provider is asked for in one request.
pub const DEFAULT_MAX_FETCH_ITEMS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Deadline for one provider call; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Upper bound on the count passed to a provider. Larger windows are
    /// served as a shorter prefix.
    pub max_items: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            max_items: DEFAULT_MAX_FETCH_ITEMS,
        }
    }
}

/// Request every demanded provider concurrently and wait for all of them.
///
/// Each provider is asked for at most `opts.max_items`. Failures (error,
/// timeout, panic, missing client) are logged and leave that provider with
/// an empty queue; they never affect other providers. Short returns are kept
/// as-is.
pub async fn fetch_all(
    demand: &Demand,
    user: &str,
    providers: &ProviderRegistry,
    opts: &FetchOptions,
) -> Queues {
    let timeout = opts.timeout;

    // Each task owns its result; the coordinator is the only writer of the map.
    let handles: Vec<_> = demand
        .iter()
        .map(|(id, &demanded)| {
            let want = demanded.min(opts.max_items);
            let client = providers.get(id).cloned();
            let user = user.to_string();
            let task_id = id.clone();
            let handle = tokio::spawn(async move {
                let client = client.ok_or_else(|| anyhow!("no client registered"))?;
                fetch_one(client.as_ref(), &task_id, &user, want, timeout).await
            });
            (id.clone(), want, handle)
        })
        .collect();

    let mut queues = Queues::with_capacity(handles.len());
    for (id, want, handle) in handles {
        let outcome = match handle.await {
            Ok(res) => res,
            Err(join_err) => Err(anyhow!("fetch task aborted: {join_err}")),
        };
        let queue = match outcome {
            Ok(items) => {
                if items.len() < want {
                    counter!("feed_provider_short_total", "provider" => id.to_string())
                        .increment(1);
                }
                ProviderQueue::from(items)
            }
            Err(e) => {
                warn!(error = ?e, provider = %id, demand = want, "content load failed");
                counter!("feed_provider_errors_total", "provider" => id.to_string()).increment(1);
                ProviderQueue::new()
            }
        };
        queues.insert(id, queue);
    }
    queues
}

async fn fetch_one(
    client: &dyn ContentProvider,
    id: &ProviderId,
    user: &str,
    want: usize,
    timeout: Option<Duration>,
) -> Result<Vec<ContentItem>> {
    let t0 = Instant::now();
    let res = match timeout {
        Some(limit) => tokio::time::timeout(limit, client.fetch(user, want))
            .await
            .map_err(|_| anyhow!("timed out after {} ms", limit.as_millis()))
            .and_then(|r| r),
        None => client.fetch(user, want).await,
    };
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_fetch_ms", "provider" => id.to_string()).record(ms);
    res
}
