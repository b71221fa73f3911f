//! In-process stand-ins for the job board used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Url;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::board::models::JobId;
use crate::board::{BoardTimeouts, JobBoard};
use crate::errors::AppError;
use crate::export::Exporter;
use crate::ranking::oracle::{Candidate, CandidateProfile, FitOracle, RankGroup};
use crate::rate_limit::RateLimiter;
use crate::state::AppState;
use crate::table::JobTable;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Well past `short_timeouts()` for pages and details.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

/// Deadlines short enough that `SLOW_RESPONSE` trips page and detail timeouts.
pub fn short_timeouts() -> BoardTimeouts {
    BoardTimeouts {
        page: Duration::from_millis(200),
        detail: Duration::from_millis(200),
        ..BoardTimeouts::default()
    }
}

pub fn board_for(base: &str) -> JobBoard {
    JobBoard::new(
        format!("{base}/session"),
        format!("{base}/search"),
        format!("{base}/logout"),
        "agent@example.com".to_string(),
        "hunter2".to_string(),
    )
    .unwrap()
}

/// Parses a raw query string, keeping every value of repeated keys.
pub fn query_pairs(raw: Option<&str>) -> HashMap<String, Vec<String>> {
    let url = Url::parse(&format!("http://upstream/?{}", raw.unwrap_or_default())).unwrap();
    let mut pairs: HashMap<String, Vec<String>> = HashMap::new();
    for (k, v) in url.query_pairs() {
        pairs.entry(k.into_owned()).or_default().push(v.into_owned());
    }
    pairs
}

pub fn first<'a>(pairs: &'a HashMap<String, Vec<String>>, key: &str) -> Option<&'a str> {
    pairs.get(key).and_then(|v| v.first()).map(String::as_str)
}

/// Scripted job board: `standard_total` jobs match at fee threshold 3 and
/// `relaxed_total` at threshold 2. Job ids are `1..=total`.
#[derive(Debug, Default)]
pub struct FakeBoard {
    pub standard_total: u64,
    pub relaxed_total: u64,
    pub failing_details: HashSet<JobId>,
    /// Detail ids answered with a body that is not JSON.
    pub malformed_details: HashSet<JobId>,
    /// Detail ids answered with a record for a different job.
    pub mismatched_details: HashSet<JobId>,
    /// Detail ids answered only after `SLOW_RESPONSE`.
    pub slow_details: HashSet<JobId>,
    /// Status returned for page queries (those carrying `offset`), if set.
    pub page_status: Option<u16>,
    /// Delay before answering page queries, if set.
    pub page_delay: Option<Duration>,
    pub fees: HashMap<JobId, f64>,
    pub requests: Mutex<Vec<HashMap<String, Vec<String>>>>,
    /// Arrival time of every search-endpoint request.
    pub arrivals: Mutex<Vec<Instant>>,
    pub logouts: Mutex<u32>,
}

impl FakeBoard {
    pub fn with_totals(standard_total: u64, relaxed_total: u64) -> Self {
        Self {
            standard_total,
            relaxed_total,
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<HashMap<String, Vec<String>>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn arrival_times(&self) -> Vec<Instant> {
        self.arrivals.lock().unwrap().clone()
    }

    pub fn fee_of(&self, id: JobId) -> f64 {
        self.fees.get(&id).copied().unwrap_or((id % 7) as f64 * 10.0)
    }
}

pub fn fake_board_router(board: Arc<FakeBoard>) -> Router {
    Router::new()
        .route(
            "/session",
            post(|| async { Json(json!({"token": "fake-token"})) }),
        )
        .route("/search", get(fake_search))
        .route(
            "/logout",
            get(|State(board): State<Arc<FakeBoard>>| async move {
                *board.logouts.lock().unwrap() += 1;
                StatusCode::OK
            }),
        )
        .with_state(board)
}

async fn fake_search(State(board): State<Arc<FakeBoard>>, RawQuery(raw): RawQuery) -> Response {
    board.arrivals.lock().unwrap().push(Instant::now());
    let pairs = query_pairs(raw.as_deref());
    board.requests.lock().unwrap().push(pairs.clone());

    if let Some(id) = first(&pairs, "id") {
        let id: JobId = id.parse().unwrap();
        if board.failing_details.contains(&id) {
            return (StatusCode::INTERNAL_SERVER_ERROR, "detail unavailable").into_response();
        }
        if board.malformed_details.contains(&id) {
            return (StatusCode::OK, "{\"id\": ").into_response();
        }
        if board.slow_details.contains(&id) {
            tokio::time::sleep(SLOW_RESPONSE).await;
        }
        let served = if board.mismatched_details.contains(&id) {
            id + 1000
        } else {
            id
        };
        return Json(json!({
            "id": served,
            "name": format!("求人{id}"),
            "company": {"name": "株式会社テスト"},
            "commissionFee": {"id": 2, "fee": board.fee_of(id)},
            "minimumQualification": format!("要件{id}"),
        }))
        .into_response();
    }

    let total = match first(&pairs, "commissionFeePercentage") {
        Some("2") => board.relaxed_total,
        _ => board.standard_total,
    };
    let offset: u64 = first(&pairs, "offset").map_or(0, |v| v.parse().unwrap());
    if first(&pairs, "offset").is_some() {
        if let Some(delay) = board.page_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = board.page_status {
            let status = StatusCode::from_u16(status).unwrap();
            return (status, "page failed").into_response();
        }
    }
    let limit: u64 = first(&pairs, "limit").map_or(25, |v| v.parse().unwrap());
    let end = (offset + limit).min(total);
    let jobs: Vec<_> = (offset..end)
        .map(|i| json!({"id": (i + 1) as JobId, "name": format!("求人{}", i + 1)}))
        .collect();
    Json(json!({"jobs": jobs, "total": total})).into_response()
}

/// App state wired to a fake board at `base` with a generous request budget.
pub fn state_for(
    base: &str,
    oracle: Arc<dyn FitOracle>,
    exporter: Arc<dyn Exporter>,
) -> AppState {
    AppState {
        board: board_for(base),
        limiter: Arc::new(RateLimiter::new(1000, 16)),
        oracle,
        exporter,
    }
}

/// Oracle that answers every request with the same groups.
pub struct StaticOracle(pub Vec<RankGroup>);

#[async_trait]
impl FitOracle for StaticOracle {
    async fn classify(
        &self,
        _profile: &CandidateProfile,
        _candidates: &[Candidate],
    ) -> Result<Vec<RankGroup>, AppError> {
        Ok(self.0.clone())
    }
}

/// Keeps exported tables in memory and hands out `memory://exports/{n}.csv`.
#[derive(Default)]
pub struct RecordingExporter {
    pub exported: Mutex<Vec<JobTable>>,
}

#[async_trait]
impl Exporter for RecordingExporter {
    async fn export(&self, table: &JobTable) -> Result<String, AppError> {
        let mut exported = self.exported.lock().unwrap();
        exported.push(table.clone());
        Ok(format!("memory://exports/{}.csv", exported.len()))
    }
}
