// src/lib.rs
// Public library surface for the binary, integration tests and reuse.

// Core: pure aggregation over immutable inputs
pub mod aggregate;
pub mod binning;
pub mod controversy;
pub mod filter;
pub mod kpi;
pub mod model;

// Data boundary
pub mod source;
pub mod validate;

// Presentation adapter
pub mod api;
pub mod config;
pub mod dashboard;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{percent_of, summarize, DonutSummary};
pub use crate::api::create_router as router;
pub use crate::binning::rebucket;
pub use crate::controversy::{hotspots, rank};
pub use crate::filter::{project_comments, project_series};
pub use crate::kpi::{format_compact, low_confidence_rate};
pub use crate::model::{
    Comment, SentimentClass, SentimentCount, SentimentFilter, TimePeriodEntry, TimeSeries,
    TopicDistribution,
};

use anyhow::Context;
use tracing::info;

use crate::api::AppState;
use crate::config::DashboardConfig;
use crate::source::{load_validated, JsonFileSource};

/// Build the full router the binary serves: load + validate the dataset named
/// by `cfg`, then mount `/metrics` when enabled.
pub async fn app(cfg: &DashboardConfig) -> anyhow::Result<axum::Router> {
    // recorder must exist before any load-time metric is written
    let metrics = if cfg.metrics_enabled {
        Some(crate::metrics::Metrics::init()?)
    } else {
        None
    };

    let source = JsonFileSource::new(&cfg.data_path);
    let data = load_validated(&source)
        .await
        .with_context(|| format!("loading dataset {}", cfg.data_path.display()))?;
    crate::metrics::record_dataset_size(data.comments.len());

    let mut router = api::create_router(AppState::new(data, cfg.settings()));
    if let Some(m) = metrics {
        router = router.merge(m.router());
        info!("metrics exposed on /metrics");
    }
    Ok(router)
}
