// Outlier detection: grouped z-scores over topic and word similarity.

pub mod topic;
pub mod word;
pub mod zscore;
