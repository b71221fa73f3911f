use std::fmt;

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::{decode, ensure_accepted, BoardTimeouts, JobBoard, AUTH_HEADER};
use crate::errors::AppError;

/// Opaque bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// A logged-in session. Holds the token for the duration of one search.
#[derive(Debug, Clone)]
pub struct AuthSession {
    board: JobBoard,
    token: AuthToken,
}

impl AuthSession {
    /// Logs in with the configured credentials. Any rejection is fatal; there is
    /// no retry.
    pub async fn login(board: &JobBoard) -> Result<Self, AppError> {
        let response = board
            .http
            .post(&board.session_url)
            .json(&LoginRequest {
                email: &board.email,
                password: &board.password,
            })
            .timeout(board.timeouts.login)
            .send()
            .await
            .map_err(|e| AppError::from_transport("login", e))?;

        info!("Login status: {}", response.status());

        let response = ensure_accepted(response).await.map_err(|e| match e {
            AppError::Upstream { status, message } => {
                AppError::Auth(format!("status {status}: {message}"))
            }
            other => other,
        })?;

        let body: LoginResponse = decode(response, "login")
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        match body.token {
            Some(token) if !token.is_empty() => Ok(Self {
                board: board.clone(),
                token: AuthToken(token),
            }),
            _ => Err(AppError::Auth("response carried no token".to_string())),
        }
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub(crate) fn timeouts(&self) -> BoardTimeouts {
        self.board.timeouts
    }

    /// GET against the search endpoint with the session header attached.
    pub(crate) fn search(&self) -> RequestBuilder {
        self.board
            .http
            .get(&self.board.search_url)
            .header(AUTH_HEADER, self.token.as_str())
    }

    /// Ends the upstream session. Failures are logged and swallowed.
    pub async fn logout(&self) {
        let result = self
            .board
            .http
            .get(&self.board.logout_url)
            .header(AUTH_HEADER, self.token.as_str())
            .timeout(self.board.timeouts.login)
            .send()
            .await;

        match result {
            Ok(response) if crate::board::is_accepted(response.status()) => {
                info!("Logged out of job board");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("Logout failed with status {status}: {body}");
            }
            Err(e) => warn!("Logout request failed: {e}"),
        }
    }
}
