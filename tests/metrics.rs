// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

// Build full in-process app (built-in blend unless FEED_CONFIG_PATH is set).
async fn build_app() -> Router {
    feed_blender::app()
        .await
        .expect("app() should build Router in tests")
}

async fn scrape(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn window_requests_show_up_in_exposition() {
    let app = build_app().await;

    let ok = app
        .clone()
        .oneshot(Request::get("/?count=5&offset=0").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let bad = app
        .clone()
        .oneshot(Request::get("/?count=0&offset=0").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let text = scrape(&app).await;
    for needle in [
        "feed_requests_total",
        "feed_bad_requests_total",
        "feed_items_served_total",
        "feed_fetch_ms",
        "feed_pattern_len",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}
