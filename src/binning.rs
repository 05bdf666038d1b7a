//! # Binner
//! Fixed-size chunking of a time series into coarser buckets.
//!
//! Chunks are consecutive and non-overlapping; the last one may be short.
//! Whether to bucket at all is the caller's decision (see
//! `dashboard::BinningPolicy`).

use std::num::NonZeroUsize;

use crate::model::{SentimentCount, TimeSeries, TimePeriodEntry};

/// Separator between the first and last label of a bucket.
pub const RANGE_SEPARATOR: &str = " → ";

/// Sum consecutive runs of `bucket_size` entries.
///
/// Each output label is `"<first> → <last>"`, one-entry chunks included.
pub fn rebucket(series: &[TimePeriodEntry], bucket_size: NonZeroUsize) -> TimeSeries {
    series
        .chunks(bucket_size.get())
        .filter_map(|chunk| {
            let first = chunk.first()?;
            let last = chunk.last()?;
            let counts: SentimentCount = chunk.iter().map(|e| &e.counts).sum();
            Some(TimePeriodEntry::new(
                range_label(&first.period_label, &last.period_label),
                counts,
            ))
        })
        .collect()
}

pub(crate) fn range_label(first: &str, last: &str) -> String {
    format!("{first}{RANGE_SEPARATOR}{last}")
}
