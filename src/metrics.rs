use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Register descriptions so series show up on /metrics.
fn describe_all() {
    describe_counter!("feed_requests_total", "Feed window requests served.");
    describe_counter!(
        "feed_bad_requests_total",
        "Feed requests rejected during parameter validation."
    );
    describe_counter!("feed_items_served_total", "Items returned across all windows.");
    describe_counter!(
        "feed_provider_errors_total",
        "Provider fetches that failed, timed out or panicked."
    );
    describe_counter!(
        "feed_provider_short_total",
        "Provider fetches that returned fewer items than demanded."
    );
    describe_histogram!("feed_fetch_ms", "Provider fetch time in milliseconds.");
    describe_gauge!("feed_pattern_len", "Slots in the active mixing pattern.");
}

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. The recorder is process-global, so
    /// later calls reuse the first handle.
    pub fn init() -> Self {
        static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();
        let handle = HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(h) => h,
                Err(e) => {
                    // Another recorder owns the process; keep a detached one so
                    // /metrics still answers.
                    tracing::warn!(error = ?e, "prometheus: recorder already installed");
                    PrometheusBuilder::new().build_recorder().handle()
                }
            })
            .clone();
        // Descriptions only stick once a recorder is installed.
        describe_all();
        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
