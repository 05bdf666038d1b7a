//! Boundary validation for data coming from a data source.
//!
//! The aggregation functions assume well-formed input. Data sources run
//! `validate_dataset` once when data enters the system and reject the whole
//! snapshot on any violation.

use std::collections::HashSet;
use thiserror::Error;

use crate::model::{Comment, TopicDistribution};
use crate::source::Dataset;

/// Topic rows are percentages and must add up to exactly this.
pub const TOPIC_PERCENT_TOTAL: u64 = 100;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("topic '{topic}' percentages sum to {sum}, expected 100")]
    TopicSum { topic: String, sum: u64 },

    #[error("duplicate topic '{0}'")]
    DuplicateTopic(String),

    #[error("duplicate comment id '{0}'")]
    DuplicateCommentId(String),

    #[error("comment '{id}' has confidence {confidence} outside [0, 1]")]
    Confidence { id: String, confidence: f64 },
}

/// Every problem found in the topic rows, in input order.
pub fn validate_topics(topics: &[TopicDistribution]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for t in topics {
        // total() saturates, so an overflowing row can never land on 100
        let sum = t.counts.total();
        if sum != TOPIC_PERCENT_TOTAL {
            errors.push(ValidationError::TopicSum {
                topic: t.topic.clone(),
                sum,
            });
        }
        if !seen.insert(t.topic.as_str()) {
            errors.push(ValidationError::DuplicateTopic(t.topic.clone()));
        }
    }
    errors
}

/// Every problem found in the comment feed, in input order.
pub fn validate_comments(comments: &[Comment]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for c in comments {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&c.confidence) {
            errors.push(ValidationError::Confidence {
                id: c.id.clone(),
                confidence: c.confidence,
            });
        }
        if !seen.insert(c.id.as_str()) {
            errors.push(ValidationError::DuplicateCommentId(c.id.clone()));
        }
    }
    errors
}

pub fn validate_dataset(data: &Dataset) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_topics(&data.topics);
    errors.extend(validate_comments(&data.comments));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
