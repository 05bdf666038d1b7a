// src/source.rs
//! Data sources feeding the dashboard.
//!
//! A source hands over one immutable `Dataset` snapshot per call. The core
//! never knows where it came from; swap `JsonFileSource` for a real analytics
//! backend by implementing `DataSource`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metrics::record_validation_errors;
use crate::model::{Comment, TimeSeries, TopicDistribution};
use crate::validate::validate_dataset;

/// Everything one rendering cycle reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Daily buckets, chronological.
    #[serde(default)]
    pub series: TimeSeries,
    #[serde(default)]
    pub topics: Vec<TopicDistribution>,
    /// Newest first, as supplied.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<Dataset>;
    fn name(&self) -> &'static str;
}

/// Fixed snapshot held in memory (tests, embedding).
#[derive(Debug, Clone)]
pub struct InMemorySource {
    data: Dataset,
}

impl InMemorySource {
    pub fn new(data: Dataset) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl DataSource for InMemorySource {
    async fn fetch(&self) -> Result<Dataset> {
        Ok(self.data.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Reads a JSON export: `{ "series": [...], "topics": [...], "comments": [...] }`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl DataSource for JsonFileSource {
    async fn fetch(&self) -> Result<Dataset> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading dataset from {}", self.path.display()))?;
        let data: Dataset = serde_json::from_str(&raw)
            .with_context(|| format!("parsing dataset JSON in {}", self.path.display()))?;
        Ok(data)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

/// Fetch from `source` and reject the snapshot if it breaks the data contract.
pub async fn load_validated(source: &dyn DataSource) -> Result<Dataset> {
    let data = source.fetch().await?;

    if let Err(errors) = validate_dataset(&data) {
        record_validation_errors(errors.len());
        for e in &errors {
            tracing::warn!(source = source.name(), error = %e, "dataset violation");
        }
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        anyhow::bail!(
            "dataset from {} rejected ({} violations): {}",
            source.name(),
            errors.len(),
            joined
        );
    }

    tracing::info!(
        source = source.name(),
        days = data.series.len(),
        topics = data.topics.len(),
        comments = data.comments.len(),
        "dataset loaded"
    );
    Ok(data)
}
