use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Every variant except `Validation` aborts the whole search operation; the only
/// absorbed failures (single detail fetches) never reach this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream login failed: {0}")]
    Auth(String),

    #[error("Upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Ranking failed: {0}")]
    Ranking(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classifies a reqwest failure on a call whose failure is fatal.
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("{context}: {err}"))
        } else {
            AppError::Transport(format!("{context}: {err}"))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Auth(msg) => {
                tracing::error!("Upstream login failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_AUTH_FAILED",
                    "Could not log in to the job search API".to_string(),
                )
            }
            AppError::Upstream { status, message } => {
                tracing::error!("Upstream error {status}: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("Job search API returned status {status}"),
                )
            }
            AppError::Timeout(msg) => {
                tracing::error!("Upstream timeout: {msg}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    "The job search API did not respond in time".to_string(),
                )
            }
            AppError::Transport(msg) => {
                tracing::error!("Upstream transport error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNREACHABLE",
                    "The job search API could not be reached".to_string(),
                )
            }
            AppError::Ranking(msg) => {
                tracing::error!("Ranking error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RANKING_ERROR",
                    "Fit ranking returned an unusable result".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The result table could not be exported".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
