use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::aggregate::{summarize, DonutSummary};
use crate::controversy::{hotspots, HotspotRow};
use crate::dashboard::{
    build_dashboard, build_feed, build_trend, BinningPolicy, DashboardSettings, DashboardView,
    FeedItem, TrendView,
};
use crate::metrics::record_dashboard_build;
use crate::model::{SentimentClass, SentimentFilter};
use crate::source::Dataset;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Shared, read-only state. The dataset is immutable for the life of the
/// router; the filter arrives with each request.
#[derive(Clone)]
pub struct AppState {
    data: Arc<Dataset>,
    settings: DashboardSettings,
}

impl AppState {
    pub fn new(data: Dataset, settings: DashboardSettings) -> Self {
        Self {
            data: Arc::new(data),
            settings,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/dashboard", get(dashboard))
        .route("/series", get(series))
        .route("/summary", get(summary))
        .route("/topics", get(topics))
        .route("/comments", get(comments))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct FilterQuery {
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SeriesQuery {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    bucket: Option<usize>,
}

fn parse_filter(raw: Option<&str>) -> Result<SentimentFilter, (StatusCode, String)> {
    match raw {
        None => Ok(SentimentFilter::All),
        Some(s) => s
            .parse::<SentimentFilter>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string())),
    }
}

async fn dashboard(
    State(state): State<AppState>,
    Query(q): Query<FilterQuery>,
) -> ApiResult<DashboardView> {
    let filter = parse_filter(q.filter.as_deref())?;

    let started = Instant::now();
    let view = build_dashboard(&state.data, filter, &state.settings);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    record_dashboard_build(filter, elapsed_ms);
    tracing::debug!(%filter, elapsed_ms, points = view.trend.points.len(), "dashboard built");

    Ok(Json(view))
}

async fn series(
    State(state): State<AppState>,
    Query(q): Query<SeriesQuery>,
) -> ApiResult<TrendView> {
    let filter = parse_filter(q.filter.as_deref())?;
    let policy = match q.bucket {
        None => state.settings.binning,
        Some(k) => {
            let bucket_size = std::num::NonZeroUsize::new(k).ok_or((
                StatusCode::BAD_REQUEST,
                "bucket must be a positive integer".to_string(),
            ))?;
            // explicit bucket size always buckets
            BinningPolicy {
                threshold: 0,
                bucket_size,
            }
        }
    };
    Ok(Json(build_trend(&state.data.series, filter, &policy)))
}

#[derive(Serialize)]
struct SummaryOut {
    #[serde(flatten)]
    summary: DonutSummary,
    positive_pct: i64,
    neutral_pct: i64,
    negative_pct: i64,
}

async fn summary(State(state): State<AppState>) -> Json<SummaryOut> {
    let s = summarize(&state.data.series);
    Json(SummaryOut {
        positive_pct: s.share(SentimentClass::Positive),
        neutral_pct: s.share(SentimentClass::Neutral),
        negative_pct: s.share(SentimentClass::Negative),
        summary: s,
    })
}

async fn topics(State(state): State<AppState>) -> Json<Vec<HotspotRow>> {
    Json(hotspots(&state.data.topics))
}

async fn comments(
    State(state): State<AppState>,
    Query(q): Query<FilterQuery>,
) -> ApiResult<Vec<FeedItem>> {
    let filter = parse_filter(q.filter.as_deref())?;
    Ok(Json(build_feed(&state.data.comments, filter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_filter_means_all() {
        assert_eq!(parse_filter(None), Ok(SentimentFilter::All));
        assert_eq!(parse_filter(Some("NEUTRAL")), Ok(SentimentFilter::Neutral));
    }

    #[test]
    fn unknown_filter_is_bad_request() {
        let (status, msg) = parse_filter(Some("angry")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("angry"));
    }
}
