// Community detection: language clusters, topic clusters, and groups of
// outlier word pairs.

pub mod graph;
pub mod languages;
pub mod louvain;
pub mod topics;
pub mod traits;
pub mod word_groups;
