//! Feed blender — binary entrypoint.
//! Boots the Axum HTTP server with the configured providers and mixing pattern.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables FEED_CONFIG_PATH / FEED_DEV_LOG from .env.
    let _ = dotenvy::dotenv();

    feed_blender::init_dev_tracing();

    let router = feed_blender::app().await?;
    Ok(router.into())
}
