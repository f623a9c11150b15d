use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::communities::louvain::LouvainPartitioner;
use crate::communities::topics::DEFAULT_TOPIC_THRESHOLD;
use crate::outliers::zscore::DEFAULT_THRESHOLD;
use crate::similarity::MetricMode;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LEXICAL_INPUT: &str = "translated_words.csv";
pub const DEFAULT_PHONETIC_INPUT: &str = "translated_words_ipa.csv";

/// Central configuration for an analysis run.
///
/// Loaded from environment variables (the .env file is read at startup via
/// dotenvy); CLI flags override individual fields. The struct is never
/// mutated once a run starts; every stage borrows it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the input tables live in (LANGPROX_DATA_DIR)
    pub data_dir: PathBuf,
    /// Directory result tables are written to (LANGPROX_OUTPUT_DIR, defaults to data_dir)
    pub output_dir: PathBuf,
    /// Written word-forms, relative to data_dir unless absolute
    pub lexical_input: PathBuf,
    /// IPA transcriptions, relative to data_dir unless absolute
    pub phonetic_input: PathBuf,
    /// |z| above this marks an outlier (default 2.0)
    pub z_threshold: f64,
    /// Cosine similarity above this links two topics (default 0.995)
    pub topic_threshold: f64,
    /// Louvain resolution (default 1.0)
    pub resolution: f64,
    /// Seed for the community detection visit order
    pub seed: Option<u64>,
    /// Draw a progress bar while the pipeline runs
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            output_dir: data_dir.clone(),
            data_dir,
            lexical_input: PathBuf::from(DEFAULT_LEXICAL_INPUT),
            phonetic_input: PathBuf::from(DEFAULT_PHONETIC_INPUT),
            z_threshold: DEFAULT_THRESHOLD,
            topic_threshold: DEFAULT_TOPIC_THRESHOLD,
            resolution: 1.0,
            seed: None,
            show_progress: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every field has a default, so this only fails when a variable is set
    /// to something that doesn't parse.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = env::var("LANGPROX_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let output_dir = env::var("LANGPROX_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.clone());

        let seed = match env::var("LANGPROX_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("LANGPROX_SEED must be an unsigned integer, got '{raw}': {e}")
            })?),
            _ => None,
        };

        Ok(Self {
            data_dir,
            output_dir,
            lexical_input: env::var("LANGPROX_LEXICAL_INPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.lexical_input),
            phonetic_input: env::var("LANGPROX_PHONETIC_INPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.phonetic_input),
            z_threshold: env_f64("LANGPROX_Z_THRESHOLD", defaults.z_threshold)?,
            topic_threshold: env_f64("LANGPROX_TOPIC_THRESHOLD", defaults.topic_threshold)?,
            resolution: env_f64("LANGPROX_RESOLUTION", defaults.resolution)?,
            seed,
            show_progress: defaults.show_progress,
        })
    }

    /// Check that thresholds and the resolution are usable.
    /// Call this before starting any run.
    pub fn validate(&self) -> Result<()> {
        if !self.z_threshold.is_finite() || self.z_threshold < 0.0 {
            anyhow::bail!(
                "z-score threshold must be a non-negative number, got {}",
                self.z_threshold
            );
        }
        if !self.topic_threshold.is_finite() || !(0.0..=1.0).contains(&self.topic_threshold) {
            anyhow::bail!(
                "topic cosine threshold must be between 0 and 1, got {}",
                self.topic_threshold
            );
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            anyhow::bail!("resolution must be positive, got {}", self.resolution);
        }
        Ok(())
    }

    /// Input table for a metric mode.
    pub fn input_path(&self, mode: MetricMode) -> PathBuf {
        let file = match mode {
            MetricMode::Lexical => &self.lexical_input,
            MetricMode::Phonetic => &self.phonetic_input,
        };
        resolve(&self.data_dir, file)
    }

    /// Output file for a table stem, tagged with the mode suffix:
    /// `<output_dir>/<stem>_<mode>.<ext>`.
    pub fn output_path(&self, stem: &str, mode: MetricMode, ext: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}_{}.{ext}", mode.suffix()))
    }

    pub fn partitioner(&self) -> LouvainPartitioner {
        LouvainPartitioner::new(self.resolution, self.seed)
    }
}

fn resolve(base: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("{name} must be a number, got '{raw}': {e}")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_topic_threshold_above_one() {
        let config = Config {
            topic_threshold: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let config = Config {
            resolution: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paths_follow_mode_suffix() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            output_dir: PathBuf::from("/out"),
            ..Config::default()
        };
        assert_eq!(
            config.input_path(MetricMode::Phonetic),
            PathBuf::from("/data/translated_words_ipa.csv")
        );
        assert_eq!(
            config.output_path("outliers_words", MetricMode::Lexical, "csv"),
            PathBuf::from("/out/outliers_words_lexical.csv")
        );
    }
}
