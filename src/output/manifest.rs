// Run manifest: a JSON record of what one pipeline run produced.
//
// Written next to the CSV tables as `run_summary_<mode>.json` so that a
// viewer (or `langprox status`) can tell which parameters produced them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::similarity::MetricMode;

pub const MANIFEST_STEM: &str = "run_summary";

/// Row counts for every emitted table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCounts {
    pub global_proximity: usize,
    pub topic_proximity: usize,
    pub topic_outliers: usize,
    pub word_outliers: usize,
    pub language_communities: usize,
    pub topic_communities: usize,
    pub word_groups: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: MetricMode,
    pub input: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub rows: usize,
    pub languages: usize,
    pub topics: usize,
    pub z_threshold: f64,
    pub topic_threshold: f64,
    pub resolution: f64,
    pub seed: Option<u64>,
    pub tables: TableCounts,
    pub positive_topic_outliers: usize,
    pub negative_topic_outliers: usize,
    pub positive_word_outliers: usize,
    pub negative_word_outliers: usize,
    /// Number of language communities per scope label
    pub language_community_counts: BTreeMap<String, u32>,
    pub topic_community_count: u32,
}

pub fn write_manifest(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_manifest(path: &Path) -> Result<RunSummary> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Malformed manifest {}", path.display()))
}
