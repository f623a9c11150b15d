// Langprox: lexical and phonetic proximity analysis across languages
//
// This is the library root. Each module corresponds to one stage of the
// analysis pipeline, plus the shared table model and output writers.

pub mod communities;
pub mod config;
pub mod error;
pub mod outliers;
pub mod output;
pub mod pipeline;
pub mod proximity;
pub mod similarity;
pub mod status;
pub mod table;
