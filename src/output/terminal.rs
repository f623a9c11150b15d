// Colored terminal summaries of pipeline runs.
//
// Counts only: the tables on disk are the actual result.

use anyhow::Result;
use colored::Colorize;

use super::manifest::RunSummary;
use crate::similarity::MetricMode;

/// Display one line block per mode: counts on success, the error on failure.
pub fn display_run_results(results: &[(MetricMode, Result<RunSummary>)]) {
    println!("\n{}", "=== Language Proximity ===".bold());

    for (mode, result) in results {
        match result {
            Ok(summary) => display_summary(summary),
            Err(e) => {
                println!(
                    "\n  {} {}",
                    mode.suffix().bold(),
                    "failed".red().bold()
                );
                println!("    {}", super::truncate_chars(&format!("{e:#}"), 160).red());
            }
        }
    }
    println!();
}

fn display_summary(summary: &RunSummary) {
    println!(
        "\n  {} {}",
        summary.mode.suffix().bold(),
        format!("({})", summary.input.display()).dimmed()
    );
    println!(
        "    {} rows, {} languages, {} topics",
        summary.rows, summary.languages, summary.topics
    );
    println!(
        "    Proximity: {} global pairs, {} topic pairs",
        summary.tables.global_proximity, summary.tables.topic_proximity
    );
    println!(
        "    Topic outliers: {} ({} {}, {} {})",
        summary.tables.topic_outliers,
        summary.positive_topic_outliers,
        "positive".green(),
        summary.negative_topic_outliers,
        "negative".yellow(),
    );
    println!(
        "    Word outliers:  {} ({} {}, {} {})",
        summary.tables.word_outliers,
        summary.positive_word_outliers,
        "positive".green(),
        summary.negative_word_outliers,
        "negative".yellow(),
    );

    let global_communities = summary
        .language_community_counts
        .get("Global")
        .copied()
        .unwrap_or(0);
    println!(
        "    Communities: {} global language, {} topic, {} word groups",
        global_communities, summary.topic_community_count, summary.tables.word_groups
    );
}
