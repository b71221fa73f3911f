pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::search::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job search API
        .route("/api/v1/jobs/count", post(handlers::handle_count))
        .route("/api/v1/jobs/search", post(handlers::handle_search))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{
        fake_board_router, spawn_upstream, state_for, FakeBoard, RecordingExporter, StaticOracle,
    };

    async fn app(board: FakeBoard) -> Router {
        let base = spawn_upstream(fake_board_router(Arc::new(board))).await;
        build_router(state_for(
            &base,
            Arc::new(StaticOracle(vec![])),
            Arc::new(RecordingExporter::default()),
        ))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(FakeBoard::default())
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["service"], "scout-api");
    }

    #[tokio::test]
    async fn test_count_endpoint() {
        let response = app(FakeBoard::with_totals(57, 80))
            .await
            .oneshot(post_json("/api/v1/jobs/count", json!({"keyword": "営業"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"total": 57, "fee_threshold": 3})
        );
    }

    #[tokio::test]
    async fn test_search_endpoint_returns_table() {
        let response = app(FakeBoard::with_totals(21, 21))
            .await
            .oneshot(post_json(
                "/api/v1/jobs/search",
                json!({"filters": {"keyword": "営業", "locations": [13]}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 21);
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(21));
        assert_eq!(body["columns"][0], "求人ID");
        assert_eq!(body["export_url"], "memory://exports/1.csv");
    }

    #[tokio::test]
    async fn test_validation_error_shape() {
        let response = app(FakeBoard::with_totals(30, 30))
            .await
            .oneshot(post_json("/api/v1/jobs/count", json!({"locations": [48]})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
