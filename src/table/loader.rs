// CSV loader for word tables.
//
// Expected header: `topic`, `source_word`, then one column per language
// code (in any position). Empty cells become missing forms.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::models::{WordRow, WordTable};
use crate::error::{ProximityError, Result};

pub const TOPIC_COLUMN: &str = "topic";
pub const SOURCE_WORD_COLUMN: &str = "source_word";

/// Load a word table from a CSV file.
///
/// A file that doesn't exist is reported as `MissingInput` so the pipeline
/// can skip this run instead of treating it as a parse failure.
pub fn load_table(path: &Path) -> Result<WordTable> {
    if !path.exists() {
        return Err(ProximityError::MissingInput(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)?;
    let table = read_table(file)?;
    info!(
        path = %path.display(),
        rows = table.rows().len(),
        languages = table.languages().len(),
        "Word table loaded"
    );
    Ok(table)
}

/// Parse a word table from any CSV reader.
pub fn read_table<R: Read>(reader: R) -> Result<WordTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let topic_idx = column_index(&headers, TOPIC_COLUMN)?;
    let source_idx = column_index(&headers, SOURCE_WORD_COLUMN)?;

    let lang_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != topic_idx && *i != source_idx)
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let topic = record.get(topic_idx).unwrap_or_default().to_string();
        let source_word = record.get(source_idx).unwrap_or_default().to_string();
        let forms = lang_cols
            .iter()
            .map(|(i, _)| match record.get(*i) {
                Some(cell) if !cell.is_empty() => Some(cell.to_string()),
                _ => None,
            })
            .collect();
        rows.push(WordRow::new(topic, source_word, forms));
    }

    debug!(rows = rows.len(), "Parsed word table rows");

    let languages = lang_cols.into_iter().map(|(_, h)| h).collect();
    WordTable::new(languages, rows)
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        ProximityError::InvalidTable(format!("missing required column '{name}'"))
    })
}
