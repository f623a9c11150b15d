// Data models: the types that flow through the analysis pipeline.
//
// The WordTable is the only input. Everything else here is a pipeline
// output that carries no further state once produced.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProximityError, Result};

/// One row of the input: a source concept and its form in every language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRow {
    pub topic: String,
    pub source_word: String,
    /// Word-forms aligned with `WordTable::languages`.
    /// `None` means no translation is available.
    pub forms: Vec<Option<String>>,
}

impl WordRow {
    pub fn new(
        topic: impl Into<String>,
        source_word: impl Into<String>,
        forms: Vec<Option<String>>,
    ) -> Self {
        Self {
            topic: topic.into(),
            source_word: source_word.into(),
            forms,
        }
    }

    /// Convenience constructor where an empty string marks a missing form.
    pub fn from_strs(topic: &str, source_word: &str, forms: &[&str]) -> Self {
        let forms = forms
            .iter()
            .map(|f| {
                if f.is_empty() {
                    None
                } else {
                    Some(f.to_string())
                }
            })
            .collect();
        Self::new(topic, source_word, forms)
    }

    pub fn form(&self, index: usize) -> Option<&str> {
        self.forms.get(index).and_then(|f| f.as_deref())
    }
}

/// A table of translated word-forms with a fixed language set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTable {
    languages: Vec<String>,
    rows: Vec<WordRow>,
}

impl WordTable {
    /// Build a table, checking that the language set is well formed and
    /// that every row carries exactly one form per language.
    pub fn new(languages: Vec<String>, rows: Vec<WordRow>) -> Result<Self> {
        if languages.is_empty() {
            return Err(ProximityError::InvalidTable(
                "no language columns".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for lang in &languages {
            if lang.trim().is_empty() {
                return Err(ProximityError::InvalidTable(
                    "empty language code".to_string(),
                ));
            }
            if !seen.insert(lang.as_str()) {
                return Err(ProximityError::InvalidTable(format!(
                    "duplicate language code '{lang}'"
                )));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.forms.len() != languages.len() {
                return Err(ProximityError::InvalidTable(format!(
                    "row {} ('{}') has {} forms, expected {}",
                    i + 1,
                    row.source_word,
                    row.forms.len(),
                    languages.len()
                )));
            }
        }

        Ok(Self { languages, rows })
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn rows(&self) -> &[WordRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every unordered language pair as column indices `(i, j)` with `i < j`,
    /// in column order.
    pub fn language_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.languages.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        pairs
    }
}

/// The granularity a similarity or community computation runs at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    Global,
    Topic(String),
}

impl Scope {
    pub fn label(&self) -> &str {
        match self {
            Scope::Global => "Global",
            Scope::Topic(topic) => topic,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Mean similarity of one language pair within one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    pub scope: Scope,
    pub language1: String,
    pub language2: String,
    pub similarity: f64,
}

impl SimilarityRecord {
    /// Order-independent key for the language pair.
    pub fn pair_key(&self) -> (String, String) {
        pair_key(&self.language1, &self.language2)
    }
}

/// Similarity of one row's two word-forms for one language pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSimilarityRecord {
    pub topic: String,
    pub source_word: String,
    pub language1: String,
    pub language2: String,
    /// Empty when the form is missing.
    pub word1: String,
    pub word2: String,
    pub similarity: f64,
}

/// Direction of a flagged deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutlierType {
    Positive,
    Negative,
}

impl OutlierType {
    pub fn from_z(z: f64) -> Self {
        if z > 0.0 {
            OutlierType::Positive
        } else {
            OutlierType::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutlierType::Positive => "Positive",
            OutlierType::Negative => "Negative",
        }
    }
}

impl fmt::Display for OutlierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node's community within one scope. Ids are only meaningful within a
/// single partitioning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityAssignment {
    pub scope: Scope,
    pub node: String,
    pub community_id: u32,
}

/// Order-independent key for a language pair.
pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_rejects_ragged_row() {
        let rows = vec![WordRow::from_strs("animals", "cat", &["cat"])];
        let err = WordTable::new(langs(&["en", "de"]), rows).unwrap_err();
        assert!(matches!(err, ProximityError::InvalidTable(_)));
    }

    #[test]
    fn test_rejects_duplicate_language() {
        let err = WordTable::new(langs(&["en", "en"]), vec![]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_language_pairs_column_order() {
        let table = WordTable::new(langs(&["en", "de", "fr"]), vec![]).unwrap();
        assert_eq!(table.language_pairs(), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_from_strs_marks_empty_as_missing() {
        let row = WordRow::from_strs("animals", "cat", &["cat", ""]);
        assert_eq!(row.form(0), Some("cat"));
        assert_eq!(row.form(1), None);
    }

    #[test]
    fn test_pair_key_is_unordered() {
        assert_eq!(pair_key("en", "de"), pair_key("de", "en"));
    }

    #[test]
    fn test_outlier_type_zero_is_negative() {
        assert_eq!(OutlierType::from_z(0.0), OutlierType::Negative);
        assert_eq!(OutlierType::from_z(2.5), OutlierType::Positive);
    }
}
