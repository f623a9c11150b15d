// Output status display: which result tables exist and when they were built.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::output::manifest::{self, MANIFEST_STEM};
use crate::output::tables::ALL_TABLES;
use crate::similarity::MetricMode;

/// Display the state of the output directory to the terminal.
pub fn show(config: &Config) -> Result<()> {
    let dir = &config.output_dir;
    if !dir.exists() {
        println!("Output directory: {} (not created)", dir.display());
        println!("\nRun `langprox run` to produce result tables.");
        return Ok(());
    }
    println!("Output directory: {}", dir.display());

    for mode in MetricMode::ALL {
        println!();
        let input = config.input_path(mode);
        if input.exists() {
            println!("{mode}: input {} ({})", input.display(), file_size(&input));
        } else {
            println!("{mode}: input {} missing", input.display());
        }

        let manifest_path = config.output_path(MANIFEST_STEM, mode, "json");
        match manifest::read_manifest(&manifest_path) {
            Ok(summary) => println!(
                "  Last run: {} ({} rows, {} languages, {} topics)",
                summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                summary.rows,
                summary.languages,
                summary.topics
            ),
            Err(_) if !manifest_path.exists() => println!("  Last run: never"),
            Err(e) => println!("  Last run: unreadable manifest ({e:#})"),
        }

        for stem in ALL_TABLES {
            let path = config.output_path(stem, mode, "csv");
            if path.exists() {
                println!("  {stem}: {}", file_size(&path));
            } else {
                println!("  {stem}: missing");
            }
        }
    }

    Ok(())
}

fn file_size(path: &Path) -> String {
    std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
