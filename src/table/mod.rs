// Word tables: the read-only input every stage borrows, plus the record
// types that flow between stages.

pub mod loader;
pub mod models;
