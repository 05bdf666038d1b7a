//! Consultation sentiment service: binary entrypoint.
//! Loads config and the dataset, then serves the dashboard view models over Axum.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use consultation_sentiment::config::DashboardConfig;

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("consultation_sentiment=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = DashboardConfig::load_default()?;
    tracing::info!(
        bind = %cfg.bind_addr,
        data = %cfg.data_path.display(),
        weekly_threshold = cfg.weekly_threshold,
        bucket_size = cfg.bucket_size,
        "config resolved"
    );

    let router = consultation_sentiment::app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!("listening on {}", cfg.bind_addr);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
