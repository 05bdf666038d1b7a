use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::model::SentimentFilter;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process and describe our series.
    ///
    /// Later calls reuse the first handle, so routers built in tests can all
    /// expose `/metrics`.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| PrometheusBuilder::new().install_recorder())?
            .clone();
        ensure_metrics_described();
        Ok(Self { handle })
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

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "dashboard_builds_total",
            "Dashboard view models assembled, by sentiment filter."
        );
        describe_histogram!(
            "dashboard_build_ms",
            "Time to assemble one dashboard view model, in milliseconds."
        );
        describe_counter!(
            "data_validation_errors_total",
            "Contract violations found in incoming datasets."
        );
        describe_gauge!(
            "dataset_comments",
            "Comments in the currently served dataset."
        );
    });
}

pub fn record_dashboard_build(filter: SentimentFilter, elapsed_ms: f64) {
    counter!("dashboard_builds_total", "filter" => filter.as_str()).increment(1);
    histogram!("dashboard_build_ms").record(elapsed_ms);
}

pub fn record_validation_errors(n: usize) {
    counter!("data_validation_errors_total").increment(n as u64);
}

pub fn record_dataset_size(comments: usize) {
    gauge!("dataset_comments").set(comments as f64);
}
