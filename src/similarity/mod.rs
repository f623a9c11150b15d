// Word-form similarity metrics: lexical and phonetic variants.

pub mod levenshtein;
pub mod lexical;
pub mod phonetic;
pub mod traits;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::lexical::LexicalMetric;
use self::phonetic::PhoneticMetric;
use self::traits::SimilarityMetric;

/// Which metric a pipeline run uses. Also tags every output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricMode {
    /// Normalized edit distance over written forms
    Lexical,
    /// Normalized edit distance over IPA transcriptions
    Phonetic,
}

impl MetricMode {
    pub const ALL: [MetricMode; 2] = [MetricMode::Lexical, MetricMode::Phonetic];

    /// File-name suffix for this mode's outputs.
    pub fn suffix(&self) -> &'static str {
        match self {
            MetricMode::Lexical => "lexical",
            MetricMode::Phonetic => "phonetic",
        }
    }

    pub fn metric(&self) -> Box<dyn SimilarityMetric> {
        match self {
            MetricMode::Lexical => Box::new(LexicalMetric),
            MetricMode::Phonetic => Box::new(PhoneticMetric),
        }
    }
}

impl fmt::Display for MetricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

impl FromStr for MetricMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexical" => Ok(MetricMode::Lexical),
            "phonetic" => Ok(MetricMode::Phonetic),
            other => Err(format!(
                "unknown metric mode '{other}' (expected lexical or phonetic)"
            )),
        }
    }
}
