//! model.rs: core value types shared by the aggregation modules.
//!
//! Everything here is plain data: counts per sentiment class, time buckets,
//! topic distributions and the comment feed. Derived views are built by the
//! `aggregate`, `binning`, `filter` and `controversy` modules and never mutate
//! these inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// One of the three labels attached to a classified comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Neutral,
    Negative,
}

impl SentimentClass {
    /// Fixed display order used by the donut and the stacked tooltip.
    pub const ALL: [SentimentClass; 3] = [
        SentimentClass::Positive,
        SentimentClass::Neutral,
        SentimentClass::Negative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentClass::Positive => "positive",
            SentimentClass::Neutral => "neutral",
            SentimentClass::Negative => "negative",
        }
    }

    /// Capitalized label ("Positive", ...).
    pub fn label(self) -> &'static str {
        match self {
            SentimentClass::Positive => "Positive",
            SentimentClass::Neutral => "Neutral",
            SentimentClass::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw counts per sentiment class. Unsigned, so negative counts cannot exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentCount {
    pub const ZERO: SentimentCount = SentimentCount {
        positive: 0,
        neutral: 0,
        negative: 0,
    };

    pub fn new(positive: u64, neutral: u64, negative: u64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    /// Saturates at `u64::MAX` instead of wrapping.
    pub fn total(&self) -> u64 {
        self.positive
            .saturating_add(self.neutral)
            .saturating_add(self.negative)
    }

    pub fn get(&self, class: SentimentClass) -> u64 {
        match class {
            SentimentClass::Positive => self.positive,
            SentimentClass::Neutral => self.neutral,
            SentimentClass::Negative => self.negative,
        }
    }

    /// Keeps `class` and zeroes the other two.
    pub fn only(&self, class: SentimentClass) -> Self {
        let mut out = Self::ZERO;
        match class {
            SentimentClass::Positive => out.positive = self.positive,
            SentimentClass::Neutral => out.neutral = self.neutral,
            SentimentClass::Negative => out.negative = self.negative,
        }
        out
    }
}

impl Add for SentimentCount {
    type Output = SentimentCount;

    fn add(self, rhs: SentimentCount) -> SentimentCount {
        SentimentCount {
            positive: self.positive.saturating_add(rhs.positive),
            neutral: self.neutral.saturating_add(rhs.neutral),
            negative: self.negative.saturating_add(rhs.negative),
        }
    }
}

impl AddAssign for SentimentCount {
    fn add_assign(&mut self, rhs: SentimentCount) {
        *self = *self + rhs;
    }
}

impl<'a> std::iter::Sum<&'a SentimentCount> for SentimentCount {
    fn sum<I: Iterator<Item = &'a SentimentCount>>(iter: I) -> Self {
        iter.fold(SentimentCount::ZERO, |acc, c| acc + *c)
    }
}

/// Count as a signed value for percentage and axis math, clamped to `i64::MAX`.
pub fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// One time bucket (a day, or an aggregated range of days).
///
/// The label is opaque: it is displayed and concatenated, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriodEntry {
    #[serde(rename = "period")]
    pub period_label: String,
    #[serde(flatten)]
    pub counts: SentimentCount,
}

impl TimePeriodEntry {
    pub fn new(period_label: impl Into<String>, counts: SentimentCount) -> Self {
        Self {
            period_label: period_label.into(),
            counts,
        }
    }
}

/// Chronologically ascending sequence of buckets, in the order the data
/// source supplied it.
pub type TimeSeries = Vec<TimePeriodEntry>;

/// Topic-level distribution. `counts` are percentages that should sum to 100;
/// `validate::validate_topics` checks that when data enters the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDistribution {
    pub topic: String,
    #[serde(flatten)]
    pub counts: SentimentCount,
}

impl TopicDistribution {
    pub fn new(topic: impl Into<String>, positive: u64, neutral: u64, negative: u64) -> Self {
        Self {
            topic: topic.into(),
            counts: SentimentCount::new(positive, neutral, negative),
        }
    }
}

/// A classified comment from the consultation feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub sentiment: SentimentClass,
    /// Classifier confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// Class selector driven by the UI (dropdown or donut slice).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentFilter {
    #[default]
    All,
    Positive,
    Neutral,
    Negative,
}

impl SentimentFilter {
    /// The selected class, or `None` for `All`.
    pub fn class(self) -> Option<SentimentClass> {
        match self {
            SentimentFilter::All => None,
            SentimentFilter::Positive => Some(SentimentClass::Positive),
            SentimentFilter::Neutral => Some(SentimentClass::Neutral),
            SentimentFilter::Negative => Some(SentimentClass::Negative),
        }
    }

    pub fn matches(self, class: SentimentClass) -> bool {
        match self.class() {
            Some(c) => c == class,
            None => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.class() {
            Some(c) => c.as_str(),
            None => "all",
        }
    }
}

/// Clicking a donut slice selects that slice's class.
impl From<SentimentClass> for SentimentFilter {
    fn from(class: SentimentClass) -> Self {
        match class {
            SentimentClass::Positive => SentimentFilter::Positive,
            SentimentClass::Neutral => SentimentFilter::Neutral,
            SentimentClass::Negative => SentimentFilter::Negative,
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment filter '{0}' (expected all, positive, neutral or negative)")]
pub struct ParseFilterError(pub String);

impl FromStr for SentimentFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(SentimentFilter::All),
            "positive" => Ok(SentimentFilter::Positive),
            "neutral" => Ok(SentimentFilter::Neutral),
            "negative" => Ok(SentimentFilter::Negative),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
