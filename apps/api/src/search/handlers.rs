use axum::{extract::State, Json};

use crate::board::count::CountResolution;
use crate::board::filters::FilterSet;
use crate::errors::AppError;
use crate::search::{run_count, run_search, SearchOutcome, SearchRequest};
use crate::state::AppState;

/// POST /api/v1/jobs/count
pub async fn handle_count(
    State(state): State<AppState>,
    Json(filters): Json<FilterSet>,
) -> Result<Json<CountResolution>, AppError> {
    Ok(Json(run_count(&state, &filters).await?))
}

/// POST /api/v1/jobs/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, AppError> {
    Ok(Json(run_search(&state, &req).await?))
}
