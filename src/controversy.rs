//! # Controversy Ranker
//! Orders topics by how evenly their opinion is split.
//!
//! Index = |positive − negative| in percentage points. A low index means a
//! contested topic, so ranking is ascending. Ties keep input order.

use serde::Serialize;

use crate::model::{signed, TopicDistribution};

/// Row for the diverging (butterfly) hotspot chart.
///
/// Negative share is signed negative and positive share positive around a
/// zero axis; neutral stays unsigned for the tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotspotRow {
    pub topic: String,
    pub negative_magnitude: i64,
    pub positive_magnitude: i64,
    pub neutral: u64,
    pub controversy: u64,
}

pub fn controversy_index(topic: &TopicDistribution) -> u64 {
    topic.counts.positive.abs_diff(topic.counts.negative)
}

/// Most controversial first. Stable sort, input untouched.
pub fn rank(topics: &[TopicDistribution]) -> Vec<TopicDistribution> {
    let mut out = topics.to_vec();
    out.sort_by_key(controversy_index);
    out
}

/// Ranked topics projected onto the diverging axes.
pub fn hotspots(topics: &[TopicDistribution]) -> Vec<HotspotRow> {
    rank(topics)
        .into_iter()
        .map(|t| HotspotRow {
            negative_magnitude: -signed(t.counts.negative),
            positive_magnitude: signed(t.counts.positive),
            neutral: t.counts.neutral,
            controversy: controversy_index(&t),
            topic: t.topic,
        })
        .collect()
}
