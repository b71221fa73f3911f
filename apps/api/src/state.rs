use std::sync::Arc;

use crate::board::JobBoard;
use crate::export::Exporter;
use crate::ranking::oracle::FitOracle;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub board: JobBoard,
    /// One limiter per process: concurrent searches share the upstream budget.
    pub limiter: Arc<RateLimiter>,
    /// Pluggable fit judge. Default: LlmFitOracle.
    pub oracle: Arc<dyn FitOracle>,
    /// Pluggable export target. Default: S3CsvExporter.
    pub exporter: Arc<dyn Exporter>,
}
