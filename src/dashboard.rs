//! # Dashboard view model
//! Assembles everything a renderer needs for one cycle: KPI chips, donut,
//! trend, topic hotspots and the triage feed.
//!
//! Pure: the caller passes the dataset, the current filter and the policy
//! settings; nothing is cached between calls. KPIs and the donut always use
//! the unfiltered series, while the trend and feed follow the filter.

use serde::Serialize;
use std::num::NonZeroUsize;

use crate::aggregate::{summarize, DonutSlice, DonutSummary, Shares};
use crate::binning::rebucket;
use crate::controversy::{hotspots, HotspotRow};
use crate::filter::{project_comments, project_series};
use crate::kpi::{
    confidence_percent, format_compact, format_signed, low_confidence_rate, range_label,
    DEFAULT_LOW_CONFIDENCE_THRESHOLD,
};
use crate::model::{
    Comment, SentimentClass, SentimentCount, SentimentFilter, TimeSeries, TimePeriodEntry,
};
use crate::source::Dataset;

pub const DEFAULT_WEEKLY_THRESHOLD: usize = 35;
pub const DEFAULT_BUCKET_SIZE: NonZeroUsize = match NonZeroUsize::new(7) {
    Some(n) => n,
    None => unreachable!(),
};

/// When to switch the trend chart from daily to bucketed points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinningPolicy {
    /// Bucket only when the series is strictly longer than this.
    pub threshold: usize,
    pub bucket_size: NonZeroUsize,
}

impl Default for BinningPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_WEEKLY_THRESHOLD,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl BinningPolicy {
    pub fn should_bucket(&self, len: usize) -> bool {
        len > self.threshold
    }

    /// Returns the series to chart and the granularity it ended up with.
    pub fn apply(&self, series: &[TimePeriodEntry]) -> (TimeSeries, Granularity) {
        if self.should_bucket(series.len()) {
            (rebucket(series, self.bucket_size), Granularity::Bucketed)
        } else {
            (series.to_vec(), Granularity::Daily)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Bucketed,
}

impl Granularity {
    pub fn label(self, bucket_size: NonZeroUsize) -> String {
        match (self, bucket_size.get()) {
            (Granularity::Daily, _) => "Daily bins".to_string(),
            (Granularity::Bucketed, 7) => "Weekly bins".to_string(),
            (Granularity::Bucketed, n) => format!("{n}-day bins"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub binning: BinningPolicy,
    pub low_confidence_threshold: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            binning: BinningPolicy::default(),
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub total: u64,
    pub total_compact: String,
    pub positive_pct: i64,
    pub negative_pct: i64,
    pub net_sentiment: i64,
    pub net_display: String,
    pub low_confidence_pct: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutCenter {
    pub net_display: String,
    pub positive_pct: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutView {
    pub summary: DonutSummary,
    pub slices: Vec<DonutSlice>,
    pub center: DonutCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    #[serde(flatten)]
    pub counts: SentimentCount,
    pub shares: Shares,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub granularity: Granularity,
    pub granularity_label: String,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub comment: Comment,
    pub confidence_pct: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: SentimentFilter,
    pub kpis: KpiRow,
    pub donut: DonutView,
    pub trend: TrendView,
    pub hotspots: Vec<HotspotRow>,
    pub feed: Vec<FeedItem>,
}

/// Filter projection first, then the binning policy.
pub fn build_trend(
    series: &[TimePeriodEntry],
    filter: SentimentFilter,
    policy: &BinningPolicy,
) -> TrendView {
    let projected = project_series(series, filter);
    let (shaped, granularity) = policy.apply(&projected);
    TrendView {
        granularity,
        granularity_label: granularity.label(policy.bucket_size),
        points: shaped
            .into_iter()
            .map(|e| TrendPoint {
                shares: Shares::of(&e.counts),
                period: e.period_label,
                counts: e.counts,
            })
            .collect(),
    }
}

pub fn build_feed(comments: &[Comment], filter: SentimentFilter) -> Vec<FeedItem> {
    project_comments(comments, filter)
        .into_iter()
        .map(|c| FeedItem {
            confidence_pct: confidence_percent(c.confidence),
            comment: c,
        })
        .collect()
}

pub fn build_dashboard(
    data: &Dataset,
    filter: SentimentFilter,
    settings: &DashboardSettings,
) -> DashboardView {
    let summary = summarize(&data.series);
    let positive_pct = summary.share(SentimentClass::Positive);
    let net_display = format_signed(summary.net_sentiment);

    let kpis = KpiRow {
        total: summary.total,
        total_compact: format_compact(summary.total),
        positive_pct,
        negative_pct: summary.share(SentimentClass::Negative),
        net_sentiment: summary.net_sentiment,
        net_display: net_display.clone(),
        low_confidence_pct: low_confidence_rate(&data.comments, settings.low_confidence_threshold),
        range: range_label(&data.series),
    };

    let donut = DonutView {
        slices: summary.slices(),
        center: DonutCenter {
            net_display,
            positive_pct,
        },
        summary,
    };

    DashboardView {
        filter,
        kpis,
        donut,
        trend: build_trend(&data.series, filter, &settings.binning),
        hotspots: hotspots(&data.topics),
        feed: build_feed(&data.comments, filter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TopicDistribution;
    use chrono::{Duration, TimeZone, Utc};

    fn daily(n: usize) -> TimeSeries {
        (1..=n)
            .map(|d| TimePeriodEntry::new(format!("{d:02}/09"), SentimentCount::new(30, 10, 5)))
            .collect()
    }

    fn sample(days: usize) -> Dataset {
        let t0 = Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap();
        let c = |id: &str, s: SentimentClass, conf: f64, mins: i64| Comment {
            id: id.into(),
            author: "someone".into(),
            text: "text".into(),
            sentiment: s,
            confidence: conf,
            created_at: t0 - Duration::minutes(mins),
        };
        Dataset {
            series: daily(days),
            topics: vec![
                TopicDistribution::new("Definitions", 40, 30, 30),
                TopicDistribution::new("Compliance", 33, 40, 27),
                TopicDistribution::new("Penalties", 28, 32, 40),
            ],
            comments: vec![
                c("c1", SentimentClass::Neutral, 0.72, 20),
                c("c2", SentimentClass::Positive, 0.89, 60),
                c("c3", SentimentClass::Negative, 0.83, 360),
                c("c4", SentimentClass::Negative, 0.61, 1560),
            ],
        }
    }

    #[test]
    fn policy_threshold_is_strict() {
        let p = BinningPolicy::default();
        assert!(!p.should_bucket(35));
        assert!(p.should_bucket(36));
    }

    #[test]
    fn short_series_stays_daily() {
        let v = build_dashboard(&sample(28), SentimentFilter::All, &DashboardSettings::default());
        assert_eq!(v.trend.granularity, Granularity::Daily);
        assert_eq!(v.trend.granularity_label, "Daily bins");
        assert_eq!(v.trend.points.len(), 28);
        assert_eq!(v.kpis.total, 1260);
        assert_eq!(v.kpis.total_compact, "1.3k");
        assert_eq!(v.kpis.net_display, "+700");
        assert_eq!(v.kpis.positive_pct, 67);
        assert_eq!(v.kpis.negative_pct, 11);
        assert_eq!(v.kpis.low_confidence_pct, 25);
        assert_eq!(v.kpis.range.as_deref(), Some("01/09 → 28/09"));
    }

    #[test]
    fn long_series_is_bucketed_weekly() {
        let v = build_dashboard(&sample(40), SentimentFilter::All, &DashboardSettings::default());
        assert_eq!(v.trend.granularity, Granularity::Bucketed);
        assert_eq!(v.trend.granularity_label, "Weekly bins");
        let json = serde_json::to_value(&v.trend).unwrap();
        assert_eq!(json["granularity"], "bucketed");
        assert_eq!(json["granularity_label"], "Weekly bins");
        assert_eq!(v.trend.points.len(), 6);
        assert_eq!(v.trend.points[0].period, "01/09 → 07/09");
        assert_eq!(v.trend.points[5].period, "36/09 → 40/09");
        assert_eq!(v.trend.points[5].counts, SentimentCount::new(150, 50, 25));
    }

    #[test]
    fn filter_masks_trend_and_feed_but_not_kpis() {
        let all = build_dashboard(&sample(10), SentimentFilter::All, &DashboardSettings::default());
        let neg =
            build_dashboard(&sample(10), SentimentFilter::Negative, &DashboardSettings::default());

        assert_eq!(neg.kpis, all.kpis);
        assert_eq!(neg.donut, all.donut);
        assert_eq!(neg.trend.points.len(), 10);
        assert!(neg
            .trend
            .points
            .iter()
            .all(|p| p.counts == SentimentCount::new(0, 0, 5) && p.shares.negative_pct == 100));

        let ids: Vec<_> = neg.feed.iter().map(|f| f.comment.id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c4"]);
        assert_eq!(neg.feed[1].confidence_pct, 61);
    }

    #[test]
    fn hotspots_are_ranked() {
        let v = build_dashboard(&sample(1), SentimentFilter::All, &DashboardSettings::default());
        let topics: Vec<_> = v.hotspots.iter().map(|h| h.topic.as_str()).collect();
        assert_eq!(topics, vec!["Compliance", "Definitions", "Penalties"]);
    }

    #[test]
    fn empty_dataset_is_all_zero() {
        let v = build_dashboard(
            &Dataset::default(),
            SentimentFilter::Positive,
            &DashboardSettings::default(),
        );
        assert_eq!(v.kpis.total, 0);
        assert_eq!(v.kpis.positive_pct, 0);
        assert_eq!(v.kpis.net_display, "+0");
        assert_eq!(v.kpis.range, None);
        assert!(v.trend.points.is_empty());
        assert!(v.feed.is_empty());
    }

    #[test]
    fn custom_bucket_label() {
        let policy = BinningPolicy {
            threshold: 2,
            bucket_size: NonZeroUsize::new(3).unwrap(),
        };
        let t = build_trend(&daily(5), SentimentFilter::All, &policy);
        assert_eq!(t.granularity_label, "3-day bins");
        assert_eq!(t.points.len(), 2);
    }
}
