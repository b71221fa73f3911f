//! Client for the upstream recruiting-platform API.
//!
//! Two-phase fetch: `fetch` pages through lightweight summaries, then `detail`
//! pulls one full record per summary. Both phases gate every request on the
//! shared `RateLimiter`; login, count and paging failures are fatal, a failed
//! detail fetch is dropped.

pub mod auth;
pub mod count;
pub mod detail;
pub mod fetch;
pub mod filters;
pub mod models;

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Response, StatusCode};

use crate::config::Config;
use crate::errors::AppError;

pub const AUTH_HEADER: &str = "x-circus-authentication-token";

/// Per-request deadlines for each kind of upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTimeouts {
    pub login: Duration,
    pub count: Duration,
    pub page: Duration,
    pub detail: Duration,
}

impl Default for BoardTimeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(20),
            count: Duration::from_secs(20),
            page: Duration::from_secs(20),
            detail: Duration::from_secs(15),
        }
    }
}

/// Endpoints and credentials of the job board, plus the pooled HTTP client.
#[derive(Debug, Clone)]
pub struct JobBoard {
    http: Client,
    timeouts: BoardTimeouts,
    session_url: String,
    search_url: String,
    logout_url: String,
    email: String,
    password: String,
}

impl JobBoard {
    pub fn new(
        session_url: String,
        search_url: String,
        logout_url: String,
        email: String,
        password: String,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build job board HTTP client")?;
        Ok(Self {
            http,
            timeouts: BoardTimeouts::default(),
            session_url,
            search_url,
            logout_url,
            email,
            password,
        })
    }

    #[cfg(test)]
    pub fn with_timeouts(mut self, timeouts: BoardTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.api_session_url.clone(),
            config.api_job_search_url.clone(),
            config.api_logout_url.clone(),
            config.login_email.clone(),
            config.login_password.clone(),
        )
    }
}

/// The upstream signals success with 200 or 201 only.
pub(crate) fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// Turns a non-accepted response into `AppError::Upstream` carrying its body.
pub(crate) async fn ensure_accepted(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if is_accepted(status) {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(AppError::Upstream {
        status: status.as_u16(),
        message,
    })
}

/// Decodes a JSON body, reporting a malformed payload as an upstream failure.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, AppError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::from_transport(context, e))?;
    serde_json::from_slice(&body).map_err(|e| AppError::Upstream {
        status,
        message: format!("{context}: malformed body: {e}"),
    })
}
