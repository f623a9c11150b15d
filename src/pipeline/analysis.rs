// Analysis pipeline: word table -> proximity -> outliers -> communities.
//
// One run per metric mode. Every stage's result is fully materialized before
// the next stage starts; nothing is streamed. The table and config are only
// borrowed, and each stage returns fresh result sets.
//
// Failure isolation: `run_all` runs each mode independently, so a missing IPA
// table skips the phonetic run without touching the lexical one.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::communities::languages::language_communities;
use crate::communities::topics::topic_communities;
use crate::communities::traits::Partitioner;
use crate::communities::word_groups::{word_outlier_groups, WordOutlierGroup};
use crate::config::Config;
use crate::outliers::topic::{topic_outliers, TopicOutlier};
use crate::outliers::word::{word_outliers, WordOutlier};
use crate::output::manifest::{self, RunSummary, TableCounts};
use crate::output::tables;
use crate::proximity;
use crate::similarity::traits::SimilarityMetric;
use crate::similarity::MetricMode;
use crate::table::loader;
use crate::table::models::{
    CommunityAssignment, OutlierType, SimilarityRecord, WordSimilarityRecord, WordTable,
};

const STAGES: u64 = 7;

/// Everything one run computes, held in memory until written.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    pub word_series: Vec<WordSimilarityRecord>,
    pub global: Vec<SimilarityRecord>,
    pub topics: Vec<SimilarityRecord>,
    pub topic_outliers: Vec<TopicOutlier>,
    pub word_outliers: Vec<WordOutlier>,
    pub language_communities: Vec<CommunityAssignment>,
    pub topic_communities: Vec<CommunityAssignment>,
    pub word_groups: Vec<WordOutlierGroup>,
}

/// Run every analysis stage over an in-memory table. No I/O.
pub fn analyze(
    table: &WordTable,
    metric: &dyn SimilarityMetric,
    config: &Config,
    partitioner: &dyn Partitioner,
    progress: &ProgressBar,
) -> Result<AnalysisOutput> {
    let languages = table.languages();

    progress.set_message("word similarity");
    let word_series = proximity::word_similarities(table, metric);
    progress.inc(1);

    progress.set_message("proximity");
    let global = proximity::aggregate_global(&word_series, languages);
    let topics = proximity::aggregate_topics(&word_series, languages);
    info!(
        metric = metric.name(),
        global = global.len(),
        topics = topics.len(),
        "Proximity computed"
    );
    progress.inc(1);

    progress.set_message("topic outliers");
    let topic_outliers = topic_outliers(&topics, &global, config.z_threshold)?;
    progress.inc(1);

    progress.set_message("word outliers");
    let word_outliers = word_outliers(&word_series, config.z_threshold)?;
    info!(
        metric = metric.name(),
        topic_outliers = topic_outliers.len(),
        word_outliers = word_outliers.len(),
        "Outliers detected"
    );
    progress.inc(1);

    progress.set_message("language communities");
    let mut scoped: Vec<SimilarityRecord> = Vec::with_capacity(global.len() + topics.len());
    scoped.extend(global.iter().cloned());
    scoped.extend(topics.iter().cloned());
    let language_communities = language_communities(&scoped, languages, partitioner)?;
    progress.inc(1);

    progress.set_message("topic communities");
    let topic_communities = topic_communities(&topics, config.topic_threshold, partitioner)?;
    progress.inc(1);

    progress.set_message("word groups");
    let word_groups = word_outlier_groups(&word_outliers);
    progress.inc(1);

    info!(
        metric = metric.name(),
        partitioner = partitioner.name(),
        language_assignments = language_communities.len(),
        topic_assignments = topic_communities.len(),
        word_groups = word_groups.len(),
        "Communities detected"
    );

    Ok(AnalysisOutput {
        word_series,
        global,
        topics,
        topic_outliers,
        word_outliers,
        language_communities,
        topic_communities,
        word_groups,
    })
}

/// Load the mode's input table, analyze it, and write every result table
/// plus the run manifest to the output directory.
pub fn run(config: &Config, mode: MetricMode) -> Result<RunSummary> {
    let input = config.input_path(mode);
    info!(mode = %mode, path = %input.display(), "Starting analysis run");

    let table = loader::load_table(&input)
        .with_context(|| format!("Cannot run {mode} analysis"))?;
    if table.is_empty() {
        warn!(mode = %mode, "Word table has no rows; outputs will be empty");
    }

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    let progress = if config.show_progress {
        let pb = ProgressBar::new(STAGES);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {prefix} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_prefix(mode.suffix());
        pb
    } else {
        ProgressBar::hidden()
    };

    let metric = mode.metric();
    let partitioner = config.partitioner();
    let output = analyze(&table, metric.as_ref(), config, &partitioner, &progress)?;
    progress.finish_and_clear();

    let tables = write_tables(config, mode, &output)?;
    let summary = summarize(config, mode, &input, &table, &output, tables);

    let manifest_path = config.output_path(manifest::MANIFEST_STEM, mode, "json");
    manifest::write_manifest(&manifest_path, &summary)?;
    info!(mode = %mode, dir = %config.output_dir.display(), "Analysis run complete");

    Ok(summary)
}

/// Run each mode in turn. A failing mode is logged and does not stop the
/// others.
pub fn run_all(config: &Config, modes: &[MetricMode]) -> Vec<(MetricMode, Result<RunSummary>)> {
    modes
        .iter()
        .map(|&mode| {
            let result = run(config, mode);
            if let Err(e) = &result {
                error!(mode = %mode, error = %format!("{e:#}"), "Analysis run failed, skipping");
            }
            (mode, result)
        })
        .collect()
}

fn write_tables(config: &Config, mode: MetricMode, output: &AnalysisOutput) -> Result<TableCounts> {
    let path = |stem: &str| config.output_path(stem, mode, "csv");

    Ok(TableCounts {
        global_proximity: tables::write_global_proximity(
            &path(tables::GLOBAL_PROXIMITY),
            &output.global,
        )?,
        topic_proximity: tables::write_topic_proximity(
            &path(tables::TOPIC_PROXIMITY),
            &output.topics,
        )?,
        topic_outliers: tables::write_topic_outliers(
            &path(tables::TOPIC_OUTLIERS),
            &output.topic_outliers,
        )?,
        word_outliers: tables::write_word_outliers(
            &path(tables::WORD_OUTLIERS),
            &output.word_outliers,
        )?,
        language_communities: tables::write_language_communities(
            &path(tables::LANGUAGE_COMMUNITIES),
            &output.language_communities,
        )?,
        topic_communities: tables::write_topic_communities(
            &path(tables::TOPIC_COMMUNITIES),
            &output.topic_communities,
        )?,
        word_groups: tables::write_word_groups(&path(tables::WORD_GROUPS), &output.word_groups)?,
    })
}

fn summarize(
    config: &Config,
    mode: MetricMode,
    input: &Path,
    table: &WordTable,
    output: &AnalysisOutput,
    tables: TableCounts,
) -> RunSummary {
    let mut language_community_counts: BTreeMap<String, u32> = BTreeMap::new();
    for a in &output.language_communities {
        let entry = language_community_counts
            .entry(a.scope.label().to_string())
            .or_insert(0);
        *entry = (*entry).max(a.community_id + 1);
    }

    let topic_count = output
        .topics
        .iter()
        .map(|r| r.scope.label())
        .collect::<BTreeSet<_>>()
        .len();

    let topic_types = split_types(output.topic_outliers.iter().map(|o| o.outlier_type));
    let word_types = split_types(output.word_outliers.iter().map(|o| o.outlier_type));

    RunSummary {
        mode,
        input: input.to_path_buf(),
        generated_at: chrono::Utc::now(),
        rows: table.rows().len(),
        languages: table.languages().len(),
        topics: topic_count,
        z_threshold: config.z_threshold,
        topic_threshold: config.topic_threshold,
        resolution: config.resolution,
        seed: config.seed,
        tables,
        positive_topic_outliers: topic_types.0,
        negative_topic_outliers: topic_types.1,
        positive_word_outliers: word_types.0,
        negative_word_outliers: word_types.1,
        language_community_counts,
        topic_community_count: output
            .topic_communities
            .iter()
            .map(|a| a.community_id + 1)
            .max()
            .unwrap_or(0),
    }
}

/// (positive, negative) counts.
fn split_types(types: impl Iterator<Item = OutlierType>) -> (usize, usize) {
    types.fold((0, 0), |(pos, neg), t| match t {
        OutlierType::Positive => (pos + 1, neg),
        OutlierType::Negative => (pos, neg + 1),
    })
}
