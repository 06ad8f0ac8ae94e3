use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics::{counter, gauge};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::engine::FeedEngine;
use crate::metrics::Metrics;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FeedEngine>,
}

pub fn router(engine: Arc<FeedEngine>) -> Router {
    let metrics = Metrics::init();
    gauge!("feed_pattern_len").set(engine.pattern().len() as f64);
    let state = AppState { engine };

    Router::new()
        .route("/", get(content))
        .route("/content", get(content))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
        .merge(metrics.router())
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("param: {0}, query parameter missing")]
    Missing(&'static str),
    #[error("param: {param}, quantity: {n}, multiple values")]
    MultipleValues { param: &'static str, n: usize },
    #[error("param: {param}, {source}")]
    NotANumber {
        param: &'static str,
        source: std::num::ParseIntError,
    },
    #[error("param: {0}, negative value")]
    Negative(&'static str),
    #[error("param: {0}, zero value")]
    Zero(&'static str),
}

impl IntoResponse for ParamError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Parse and validate a single non-negative integer parameter.
fn non_negative_param(pairs: &[(String, String)], name: &'static str) -> Result<usize, ParamError> {
    let values: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .collect();
    let raw = match values.as_slice() {
        [] => return Err(ParamError::Missing(name)),
        [one] => *one,
        many => {
            return Err(ParamError::MultipleValues {
                param: name,
                n: many.len(),
            })
        }
    };
    let parsed: i64 = raw
        .parse()
        .map_err(|source| ParamError::NotANumber { param: name, source })?;
    usize::try_from(parsed).map_err(|_| ParamError::Negative(name))
}

/// Validated `(count, offset)` of a window request.
pub fn window_params(pairs: &[(String, String)]) -> Result<(usize, usize), ParamError> {
    let count = non_negative_param(pairs, "count")?;
    if count == 0 {
        return Err(ParamError::Zero("count"));
    }
    let offset = non_negative_param(pairs, "offset")?;
    Ok((count, offset))
}

/// First address of the forwarded-for chain; empty when the header is absent.
pub fn user_ip(headers: &HeaderMap) -> String {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

async fn content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let (count, offset) = match window_params(&pairs) {
        Ok(v) => v,
        Err(e) => {
            counter!("feed_bad_requests_total").increment(1);
            info!(error = %e, "rejected window request");
            return e.into_response();
        }
    };

    let items = state.engine.window(count, offset, &user_ip(&headers)).await;
    counter!("feed_requests_total").increment(1);
    counter!("feed_items_served_total").increment(items.len() as u64);
    info!(count, offset, served = items.len(), "window served");

    match serde_json::to_vec(&items) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "serializing window failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn q(s: &str) -> Vec<(String, String)> {
        s.split('&')
            .filter(|kv| !kv.is_empty())
            .map(|kv| {
                let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
                (k.to_string(), v.to_string())
            })
            .collect()
    }

    #[test]
    fn parses_valid_params() {
        assert_eq!(window_params(&q("offset=0&count=1")), Ok((1, 0)));
        assert_eq!(window_params(&q("offset=21&count=73")), Ok((73, 21)));
    }

    #[test]
    fn rejects_invalid_params() {
        assert_eq!(window_params(&q("")), Err(ParamError::Missing("count")));
        assert_eq!(window_params(&q("offset=21")), Err(ParamError::Missing("count")));
        assert_eq!(window_params(&q("count=73")), Err(ParamError::Missing("offset")));
        assert_eq!(
            window_params(&q("count=73&count=21")),
            Err(ParamError::MultipleValues { param: "count", n: 2 })
        );
        assert_eq!(
            window_params(&q("offset=-21&count=1")),
            Err(ParamError::Negative("offset"))
        );
        assert_eq!(
            window_params(&q("offset=0&count=-21")),
            Err(ParamError::Negative("count"))
        );
        assert_eq!(window_params(&q("offset=3&count=0")), Err(ParamError::Zero("count")));
        assert!(matches!(
            window_params(&q("count=dummy")),
            Err(ParamError::NotANumber { param: "count", .. })
        ));
    }

    #[test]
    fn user_ip_takes_first_forwarded_address() {
        let mut h = HeaderMap::new();
        assert_eq!(user_ip(&h), "");
        h.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.195, 70.41.3.18, 150.172.238.178"),
        );
        assert_eq!(user_ip(&h), "203.0.113.195");
    }
}
