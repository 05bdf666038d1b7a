//! KPI helpers for the chip row and the triage feed.

use crate::aggregate::percent_of;
use crate::binning::range_label as join_range;
use crate::model::{Comment, TimePeriodEntry};

/// Comments below this confidence count as "low confidence".
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Percent of comments with `confidence < threshold`; 0 for an empty feed.
pub fn low_confidence_rate(comments: &[Comment], threshold: f64) -> i64 {
    let low = comments.iter().filter(|c| c.confidence < threshold).count();
    percent_of(low as i64, comments.len() as i64)
}

/// `1234` → `"1.2k"`, `999` → `"999"`.
pub fn format_compact(n: u64) -> String {
    if n >= 1000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}

/// Net sentiment with an explicit sign: `+700`, `0` → `+0`, `-12`.
pub fn format_signed(n: i64) -> String {
    if n >= 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

/// `"<first label> → <last label>"` of the whole series.
pub fn range_label(series: &[TimePeriodEntry]) -> Option<String> {
    let first = series.first()?;
    let last = series.last()?;
    Some(join_range(&first.period_label, &last.period_label))
}

/// Confidence badge value, e.g. `0.72` → `72`.
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}
