//! # Aggregator
//! Pure totals over a time series: class sums, grand total, net sentiment,
//! and the integer percentage helper every view shares.
//!
//! No I/O and no state. Empty input is a defined state (all zeros), not an
//! error.

use serde::{Deserialize, Serialize};

use crate::model::{signed, SentimentClass, SentimentCount, TimePeriodEntry};

/// Snapshot used by the donut and the KPI row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonutSummary {
    pub totals_by_class: SentimentCount,
    pub total: u64,
    /// `positive - negative`; may be negative.
    pub net_sentiment: i64,
}

/// One donut slice in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonutSlice {
    pub class: SentimentClass,
    pub label: &'static str,
    pub value: u64,
}

impl DonutSummary {
    pub fn from_counts(totals: SentimentCount) -> Self {
        Self {
            totals_by_class: totals,
            total: totals.total(),
            net_sentiment: signed(totals.positive).saturating_sub(signed(totals.negative)),
        }
    }

    /// Whole-percent share of `class` in the total (0 when the total is 0).
    pub fn share(&self, class: SentimentClass) -> i64 {
        percent_of(signed(self.totals_by_class.get(class)), signed(self.total))
    }

    pub fn slices(&self) -> Vec<DonutSlice> {
        SentimentClass::ALL
            .iter()
            .map(|&class| DonutSlice {
                class,
                label: class.label(),
                value: self.totals_by_class.get(class),
            })
            .collect()
    }
}

/// Per-entry breakdown shown in the stacked-chart tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shares {
    pub positive_pct: i64,
    pub neutral_pct: i64,
    pub negative_pct: i64,
    pub total: u64,
}

impl Shares {
    pub fn of(counts: &SentimentCount) -> Self {
        let total = counts.total();
        let t = signed(total);
        Self {
            positive_pct: percent_of(signed(counts.positive), t),
            neutral_pct: percent_of(signed(counts.neutral), t),
            negative_pct: percent_of(signed(counts.negative), t),
            total,
        }
    }
}

/// Sum every entry field-wise.
pub fn summarize(series: &[TimePeriodEntry]) -> DonutSummary {
    let totals: SentimentCount = series.iter().map(|e| &e.counts).sum();
    DonutSummary::from_counts(totals)
}

/// `numerator / denominator * 100`, rounded half-up to a whole percent.
///
/// Returns 0 whenever `denominator <= 0`. Computed in integers so results
/// like 12.5 → 13 do not depend on float representation.
pub fn percent_of(numerator: i64, denominator: i64) -> i64 {
    if denominator <= 0 {
        return 0;
    }
    let n = numerator as i128;
    let d = denominator as i128;
    // floor(100n/d + 1/2) == floor((200n + d) / 2d)
    (200 * n + d).div_euclid(2 * d) as i64
}
