// Pipeline: per-mode orchestration of the analysis stages.

pub mod analysis;

pub use analysis::{analyze, run, run_all, AnalysisOutput};
