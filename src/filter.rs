//! # Filter Engine
//! Projects source data down to the selected sentiment class.
//!
//! Series are masked (shape preserved, other classes zeroed) so chart axes
//! stay stable; comments are filtered (non-matching ones dropped).

use crate::model::{Comment, SentimentFilter, TimeSeries, TimePeriodEntry};

/// Masking projection of a series. `All` returns an equal copy.
pub fn project_series(series: &[TimePeriodEntry], selector: SentimentFilter) -> TimeSeries {
    match selector.class() {
        None => series.to_vec(),
        Some(class) => series
            .iter()
            .map(|e| TimePeriodEntry {
                period_label: e.period_label.clone(),
                counts: e.counts.only(class),
            })
            .collect(),
    }
}

/// Inclusion filter over the comment feed, order preserved.
pub fn project_comments(comments: &[Comment], selector: SentimentFilter) -> Vec<Comment> {
    comments
        .iter()
        .filter(|c| selector.matches(c.sentiment))
        .cloned()
        .collect()
}
