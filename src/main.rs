//! Stashkv demo binary
//!
//! Constructs the backend selected by the environment and runs one
//! put/get/delete cycle against it.

use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stashkv::{storage, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stashkv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("using {:?} backend", config.backend);

    let cache = storage::from_config::<String>(&config).await?;

    cache
        .put("test", "value".to_string(), Duration::from_secs(5))
        .await?;
    match cache.get("test").await {
        Ok(value) => info!("got value for \"test\": {value}"),
        Err(err) => info!("lookup failed: {err}"),
    }

    cache.delete("test").await?;
    cache.stop().await?;
    info!("done");

    Ok(())
}
