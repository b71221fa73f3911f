//! Search orchestration over one upstream session.
//!
//! Phases run strictly in sequence: paging completes before enrichment starts,
//! and ranking only sees the enriched dataset. Logout is attempted whatever the
//! outcome; its failure never changes the result.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::auth::AuthSession;
use crate::board::count::{resolve_count, CountResolution};
use crate::board::detail::enrich_all;
use crate::board::fetch::{fetch_resolved, PAGE_SIZE};
use crate::board::filters::FilterSet;
use crate::errors::AppError;
use crate::ranking::oracle::CandidateProfile;
use crate::ranking::ranker::rank;
use crate::state::AppState;
use crate::table::{project, JobTable};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub filters: FilterSet,
    #[serde(default)]
    pub profile: CandidateProfile,
}

#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub total: u64,
    pub fee_threshold: u8,
    pub fetched: usize,
    pub enriched: usize,
    /// `None` when no job survived enrichment; nothing is exported then.
    pub export_url: Option<String>,
    #[serde(flatten)]
    pub table: JobTable,
}

pub async fn run_count(state: &AppState, filters: &FilterSet) -> Result<CountResolution, AppError> {
    filters.validate()?;
    let session = AuthSession::login(&state.board).await?;
    let result = resolve_count(&session, filters).await;
    session.logout().await;
    result
}

pub async fn run_search(state: &AppState, request: &SearchRequest) -> Result<SearchOutcome, AppError> {
    request.filters.validate()?;
    let session = AuthSession::login(&state.board).await?;
    let result = search_in_session(state, &session, request).await;
    session.logout().await;
    result
}

async fn search_in_session(
    state: &AppState,
    session: &AuthSession,
    request: &SearchRequest,
) -> Result<SearchOutcome, AppError> {
    let resolution = resolve_count(session, &request.filters).await?;
    let summaries = fetch_resolved(
        session,
        &state.limiter,
        &request.filters,
        resolution,
        PAGE_SIZE,
    )
    .await?;
    let details = enrich_all(session, &state.limiter, &summaries).await;
    info!(
        "Search resolved {} matches, fetched {}, enriched {}",
        resolution.total,
        summaries.len(),
        details.len()
    );

    let order = rank(state.oracle.as_ref(), &request.profile, &details).await?;
    let table = project(&details, &order);

    let export_url = if table.is_empty() {
        info!("No jobs to export");
        None
    } else {
        Some(state.exporter.export(&table).await?)
    };

    Ok(SearchOutcome {
        total: resolution.total,
        fee_threshold: resolution.threshold.percentage(),
        fetched: summaries.len(),
        enriched: details.len(),
        export_url,
        table,
    })
}
