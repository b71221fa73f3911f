// End-to-end search: login, count, page, enrich, rank, project, export, logout.
pub mod handlers;
pub mod pipeline;

pub use pipeline::{run_count, run_search, SearchOutcome, SearchRequest};
