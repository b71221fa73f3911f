//! Per-job detail enrichment. A failed fetch drops that job and nothing else.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::board::auth::AuthSession;
use crate::board::models::{JobDetail, JobId, JobSummary};
use crate::board::{decode, ensure_accepted};
use crate::errors::AppError;
use crate::rate_limit::RateLimiter;

const MAX_DETAIL_WORKERS: usize = 8;

/// Fetches one detail per distinct summary id. Never fails: the output holds the
/// details that could be fetched, so `output.len() <= summaries.len()`.
pub async fn enrich_all(
    session: &AuthSession,
    limiter: &Arc<RateLimiter>,
    summaries: &[JobSummary],
) -> Vec<JobDetail> {
    let mut seen = HashSet::with_capacity(summaries.len());
    let ids: Vec<JobId> = summaries
        .iter()
        .map(|s| s.id)
        .filter(|id| seen.insert(*id))
        .collect();
    if ids.len() < summaries.len() {
        warn!(
            "Dropped {} duplicate summaries before enrichment",
            summaries.len() - ids.len()
        );
    }

    let workers = limiter.burst().min(MAX_DETAIL_WORKERS);
    info!("Fetching {} job details with {} workers", ids.len(), workers);

    let permits = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();
    for id in ids.iter().copied() {
        let session = session.clone();
        let limiter = Arc::clone(limiter);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            limiter.acquire().await;
            match fetch_detail(&session, id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    warn!("Skipping job {id}: {e}");
                    None
                }
            }
        });
    }

    let mut details = Vec::with_capacity(ids.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(detail)) => details.push(detail),
            Ok(None) => {}
            Err(e) => warn!("Detail task failed: {e}"),
        }
    }

    info!("Enriched {} of {} jobs", details.len(), ids.len());
    details
}

async fn fetch_detail(session: &AuthSession, id: JobId) -> Result<JobDetail, AppError> {
    let context = format!("detail {id}");
    let response = session
        .search()
        .query(&[("id", id)])
        .timeout(session.timeouts().detail)
        .send()
        .await
        .map_err(|e| AppError::from_transport(&context, e))?;

    debug!("Detail {id} status: {}", response.status());
    let response = ensure_accepted(response).await?;
    let detail: JobDetail = decode(response, &context).await?;
    if detail.id != id {
        return Err(AppError::Upstream {
            status: 200,
            message: format!("{context}: response was for job {}", detail.id),
        });
    }
    Ok(detail)
}
