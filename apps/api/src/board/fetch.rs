//! Parallel page retrieval of all summaries for a filter set.
//!
//! One task per page offset, at most `min(6, burst)` in flight, each admitted by
//! the shared `RateLimiter`. The first failing page aborts every outstanding page
//! and the whole fetch returns that error; no partial list is produced.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::board::auth::AuthSession;
use crate::board::count::{resolve_count, CountResolution};
use crate::board::filters::{FilterSet, QueryPairs};
use crate::board::models::{JobSummary, SearchPage};
use crate::board::{decode, ensure_accepted};
use crate::errors::AppError;
use crate::rate_limit::RateLimiter;

pub const PAGE_SIZE: u64 = 25;
const MAX_PAGE_WORKERS: usize = 6;

/// Largest reported total a search will page through; beyond it the count is
/// treated as an upstream fault.
pub const MAX_TOTAL: u64 = 100_000;

/// Offsets `0, page_size, 2*page_size, ...` strictly below `total`, yielded lazily.
pub fn page_offsets(total: u64, page_size: u64) -> impl Iterator<Item = u64> {
    let step = page_size.max(1);
    (0..total).step_by(usize::try_from(step).unwrap_or(usize::MAX))
}

/// Resolves the fee threshold with the counting rule, then fetches every page.
pub async fn fetch_all(
    session: &AuthSession,
    limiter: &Arc<RateLimiter>,
    filters: &FilterSet,
    page_size: u64,
) -> Result<Vec<JobSummary>, AppError> {
    let resolution = resolve_count(session, filters).await?;
    fetch_resolved(session, limiter, filters, resolution, page_size).await
}

/// Fetches every page for an already-resolved count. Result order is unspecified.
pub async fn fetch_resolved(
    session: &AuthSession,
    limiter: &Arc<RateLimiter>,
    filters: &FilterSet,
    resolution: CountResolution,
    page_size: u64,
) -> Result<Vec<JobSummary>, AppError> {
    if resolution.total > MAX_TOTAL {
        return Err(AppError::Upstream {
            status: 200,
            message: format!(
                "reported total {} exceeds the paging ceiling of {MAX_TOTAL}",
                resolution.total
            ),
        });
    }
    let page_size = page_size.max(1);
    let workers = limiter.burst().min(MAX_PAGE_WORKERS);
    info!(
        "Fetching {} pages ({} jobs) with {} workers",
        resolution.total.div_ceil(page_size),
        resolution.total,
        workers
    );

    let base_query = Arc::new(filters.to_query(resolution.threshold)?);
    let permits = Arc::new(Semaphore::new(workers));
    let mut pages = JoinSet::new();

    for offset in page_offsets(resolution.total, page_size) {
        let session = session.clone();
        let limiter = Arc::clone(limiter);
        let permits = Arc::clone(&permits);
        let base_query = Arc::clone(&base_query);
        pages.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
            limiter.acquire().await;
            fetch_page(&session, &base_query, offset, page_size).await
        });
    }

    let mut summaries = Vec::new();
    while let Some(joined) = pages.join_next().await {
        let page = match joined {
            Ok(result) => result,
            Err(e) => Err(AppError::Internal(anyhow::anyhow!("page task failed: {e}"))),
        };
        match page {
            Ok(jobs) => summaries.extend(jobs),
            Err(e) => {
                pages.abort_all();
                return Err(e);
            }
        }
    }

    info!("Fetched {} job summaries", summaries.len());
    Ok(summaries)
}

async fn fetch_page(
    session: &AuthSession,
    base_query: &QueryPairs,
    offset: u64,
    limit: u64,
) -> Result<Vec<JobSummary>, AppError> {
    let page = offset / limit + 1;
    let mut query: QueryPairs = vec![
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
        ("page", page.to_string()),
        ("order", "desc".to_string()),
        ("orderBy", "recommendScore".to_string()),
    ];
    query.extend(base_query.iter().cloned());

    let context = format!("page {page} (offset {offset})");
    let response = session
        .search()
        .query(&query)
        .timeout(session.timeouts().page)
        .send()
        .await
        .map_err(|e| AppError::from_transport(&context, e))?;

    debug!("Page {page} status: {}", response.status());
    let response = ensure_accepted(response).await?;
    let body: SearchPage = decode(response, &context).await?;
    Ok(body.jobs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;
    use crate::board::detail::enrich_all;
    use crate::board::filters::FeeThreshold;
    use crate::test_support::{
        board_for, fake_board_router, first, short_timeouts, spawn_upstream, FakeBoard,
        SLOW_RESPONSE,
    };

    async fn session_for(board: Arc<FakeBoard>) -> AuthSession {
        let base = spawn_upstream(fake_board_router(board)).await;
        AuthSession::login(&board_for(&base)).await.unwrap()
    }

    #[test]
    fn test_page_offsets() {
        let offsets = |total, size| page_offsets(total, size).collect::<Vec<u64>>();
        assert_eq!(offsets(0, 25), Vec::<u64>::new());
        assert_eq!(offsets(25, 25), vec![0]);
        assert_eq!(offsets(26, 25), vec![0, 25]);
        assert_eq!(offsets(101, 25), vec![0, 25, 50, 75, 100]);
        assert_eq!(page_offsets(u64::MAX, 25).nth(2), Some(50));
    }

    #[tokio::test]
    async fn test_fetch_all_covers_total_without_duplicates() {
        let board = Arc::new(FakeBoard::with_totals(113, 200));
        let session = session_for(Arc::clone(&board)).await;
        let limiter = Arc::new(RateLimiter::new(100, 100));

        let jobs = fetch_all(&session, &limiter, &FilterSet::default(), PAGE_SIZE)
            .await
            .unwrap();

        let ids: HashSet<_> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(jobs.len(), 113);
        assert_eq!(ids.len(), 113);
        assert_eq!(ids, (1..=113).collect::<HashSet<_>>());
    }

    #[tokio::test]
    async fn test_pages_use_relaxed_threshold_when_count_is_low() {
        let board = Arc::new(FakeBoard::with_totals(4, 30));
        let session = session_for(Arc::clone(&board)).await;
        let limiter = Arc::new(RateLimiter::new(100, 100));

        let jobs = fetch_all(&session, &limiter, &FilterSet::default(), PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(jobs.len(), 30);

        let page_requests: Vec<_> = board
            .recorded()
            .into_iter()
            .filter(|q| q.contains_key("offset"))
            .collect();
        assert_eq!(page_requests.len(), 2);
        for q in &page_requests {
            assert_eq!(first(q, "commissionFeePercentage"), Some("2"));
            assert_eq!(first(q, "limit"), Some("25"));
            assert_eq!(first(q, "orderBy"), Some("recommendScore"));
        }
        let mut pages: Vec<_> = page_requests
            .iter()
            .map(|q| first(q, "page").unwrap().to_string())
            .collect();
        pages.sort();
        assert_eq!(pages, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_failing_page_is_fatal() {
        let board = Arc::new(FakeBoard {
            page_status: Some(500),
            ..FakeBoard::with_totals(60, 60)
        });
        let session = session_for(board).await;
        let limiter = Arc::new(RateLimiter::new(100, 100));

        let err = fetch_all(&session, &limiter, &FilterSet::default(), PAGE_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_zero_total_fetches_no_pages() {
        let board = Arc::new(FakeBoard::with_totals(0, 0));
        let session = session_for(Arc::clone(&board)).await;
        let limiter = Arc::new(RateLimiter::new(4, 4));
        let resolution = CountResolution {
            threshold: FeeThreshold::Relaxed,
            total: 0,
        };

        let jobs = fetch_resolved(&session, &limiter, &FilterSet::default(), resolution, 25)
            .await
            .unwrap();
        assert!(jobs.is_empty());
        assert!(board.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_total_rejected_before_any_request() {
        let board = Arc::new(FakeBoard::with_totals(0, 0));
        let session = session_for(Arc::clone(&board)).await;
        let limiter = Arc::new(RateLimiter::new(4, 4));
        let resolution = CountResolution {
            threshold: FeeThreshold::Standard,
            total: u64::MAX,
        };

        let err = fetch_resolved(&session, &limiter, &FilterSet::default(), resolution, 25)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream { .. }));
        assert!(board.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_page_timeout_is_fatal() {
        let board = Arc::new(FakeBoard {
            page_delay: Some(SLOW_RESPONSE),
            ..FakeBoard::with_totals(30, 30)
        });
        let base = spawn_upstream(fake_board_router(board)).await;
        let session = AuthSession::login(&board_for(&base).with_timeouts(short_timeouts()))
            .await
            .unwrap();
        let limiter = Arc::new(RateLimiter::new(100, 100));
        let resolution = CountResolution {
            threshold: FeeThreshold::Standard,
            total: 30,
        };

        let err = fetch_resolved(&session, &limiter, &FilterSet::default(), resolution, 25)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_pages_and_details_share_one_request_budget() {
        let board = Arc::new(FakeBoard::with_totals(4, 4));
        let session = session_for(Arc::clone(&board)).await;
        let limiter = Arc::new(RateLimiter::new(2, 2));
        let resolution = CountResolution {
            threshold: FeeThreshold::Standard,
            total: 4,
        };

        let summaries = fetch_resolved(&session, &limiter, &FilterSet::default(), resolution, 2)
            .await
            .unwrap();
        let details = enrich_all(&session, &limiter, &summaries).await;
        assert_eq!(details.len(), 4);

        // 2 pages then 4 details; any 3 arrivals must span the window. The slack
        // absorbs loopback latency between admission and arrival.
        let mut arrivals = board.arrival_times();
        arrivals.sort();
        assert_eq!(arrivals.len(), 6);
        for window in arrivals.windows(3) {
            let span = window[2].duration_since(window[0]);
            assert!(span >= Duration::from_millis(900), "3 requests within {span:?}");
        }
    }
}
