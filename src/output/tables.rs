// CSV writers for the pipeline's result tables.
//
// Column names are fixed: downstream viewers read these files by header,
// so each table writes its header even when it has no rows.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::communities::word_groups::WordOutlierGroup;
use crate::outliers::topic::TopicOutlier;
use crate::outliers::word::WordOutlier;
use crate::table::models::{CommunityAssignment, SimilarityRecord};

pub const GLOBAL_PROXIMITY: &str = "language_proximity_global";
pub const TOPIC_PROXIMITY: &str = "language_proximity_by_topic";
pub const TOPIC_OUTLIERS: &str = "outliers_topics";
pub const WORD_OUTLIERS: &str = "outliers_words";
pub const LANGUAGE_COMMUNITIES: &str = "language_communities";
pub const TOPIC_COMMUNITIES: &str = "topic_communities";
pub const WORD_GROUPS: &str = "word_community_groups";

/// Every CSV table stem, in pipeline order.
pub const ALL_TABLES: [&str; 7] = [
    GLOBAL_PROXIMITY,
    TOPIC_PROXIMITY,
    TOPIC_OUTLIERS,
    WORD_OUTLIERS,
    LANGUAGE_COMMUNITIES,
    TOPIC_COMMUNITIES,
    WORD_GROUPS,
];

#[derive(Serialize)]
struct GlobalRow<'a> {
    language1: &'a str,
    language2: &'a str,
    similarity: f64,
}

#[derive(Serialize)]
struct TopicRow<'a> {
    topic: &'a str,
    language1: &'a str,
    language2: &'a str,
    similarity: f64,
}

#[derive(Serialize)]
struct CommunityRow<'a> {
    scope: &'a str,
    node: &'a str,
    community_id: u32,
}

#[derive(Serialize)]
struct TopicCommunityRow<'a> {
    topic: &'a str,
    community_id: u32,
}

#[derive(Serialize)]
struct WordGroupRow<'a> {
    outlier_type: &'a str,
    lang_pair: &'a str,
    /// JSON array of source words
    source_words: String,
}

pub fn write_global_proximity(path: &Path, records: &[SimilarityRecord]) -> Result<usize> {
    write_table(
        path,
        &["Language1", "Language2", "GlobalSimilarity"],
        records.iter().map(|r| GlobalRow {
            language1: &r.language1,
            language2: &r.language2,
            similarity: r.similarity,
        }),
    )
}

pub fn write_topic_proximity(path: &Path, records: &[SimilarityRecord]) -> Result<usize> {
    write_table(
        path,
        &["Topic", "Language1", "Language2", "TopicSimilarity"],
        records.iter().map(|r| TopicRow {
            topic: r.scope.label(),
            language1: &r.language1,
            language2: &r.language2,
            similarity: r.similarity,
        }),
    )
}

pub fn write_topic_outliers(path: &Path, outliers: &[TopicOutlier]) -> Result<usize> {
    write_table(
        path,
        &[
            "Topic",
            "Language1",
            "Language2",
            "TopicSimilarity",
            "GlobalSimilarity",
            "Difference",
            "mean",
            "std",
            "z_score",
            "OutlierType",
        ],
        outliers,
    )
}

pub fn write_word_outliers(path: &Path, outliers: &[WordOutlier]) -> Result<usize> {
    write_table(
        path,
        &[
            "Topic",
            "SourceWord",
            "Lang1",
            "Lang2",
            "Word1",
            "Word2",
            "WordSimilarity",
            "mean",
            "std",
            "z_score",
            "OutlierType",
        ],
        outliers,
    )
}

pub fn write_language_communities(path: &Path, assignments: &[CommunityAssignment]) -> Result<usize> {
    write_table(
        path,
        &["Scope", "Language", "CommunityID"],
        assignments.iter().map(|a| CommunityRow {
            scope: a.scope.label(),
            node: &a.node,
            community_id: a.community_id,
        }),
    )
}

pub fn write_topic_communities(path: &Path, assignments: &[CommunityAssignment]) -> Result<usize> {
    write_table(
        path,
        &["Topic", "CommunityID"],
        assignments.iter().map(|a| TopicCommunityRow {
            topic: &a.node,
            community_id: a.community_id,
        }),
    )
}

pub fn write_word_groups(path: &Path, groups: &[WordOutlierGroup]) -> Result<usize> {
    let rows = groups
        .iter()
        .map(|g| {
            Ok(WordGroupRow {
                outlier_type: g.outlier_type.as_str(),
                lang_pair: &g.lang_pair,
                source_words: serde_json::to_string(&g.source_words)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    write_table(path, &["OutlierType", "LangPair", "SourceWord"], rows)
}

/// Write a header row followed by one serialized row per item.
/// Returns the number of data rows written.
fn write_table<T, I>(path: &Path, headers: &[&str], rows: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(headers)?;
    let mut count = 0;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
        count += 1;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::models::{OutlierType, Scope};

    #[test]
    fn test_header_written_for_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outliers_words_lexical.csv");
        let count = write_word_outliers(&path, &[]).unwrap();
        assert_eq!(count, 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim(),
            "Topic,SourceWord,Lang1,Lang2,Word1,Word2,WordSimilarity,mean,std,z_score,OutlierType"
        );
    }

    #[test]
    fn test_topic_proximity_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topic.csv");
        let records = vec![SimilarityRecord {
            scope: Scope::Topic("animals".to_string()),
            language1: "en".to_string(),
            language2: "de".to_string(),
            similarity: 0.4,
        }];
        write_topic_proximity(&path, &records).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Topic,Language1,Language2,TopicSimilarity");
        assert_eq!(lines[1], "animals,en,de,0.4");
    }

    #[test]
    fn test_word_groups_serialize_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.csv");
        let groups = vec![WordOutlierGroup {
            outlier_type: OutlierType::Negative,
            lang_pair: "de-en".to_string(),
            source_words: vec!["cat".to_string(), "dog".to_string()],
        }];
        write_word_groups(&path, &groups).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Negative");
        assert_eq!(&record[1], "de-en");
        let words: Vec<String> = serde_json::from_str(&record[2]).unwrap();
        assert_eq!(words, vec!["cat", "dog"]);
    }
}
