use anyhow::{Context, Result};

const DEFAULT_RPS: u32 = 4;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_session_url: String,
    pub api_job_search_url: String,
    pub api_logout_url: String,
    pub login_email: String,
    pub login_password: String,
    pub anthropic_api_key: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub rate_limit: RateLimitConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Outbound request budget for the upstream search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub rps: u32,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rps: DEFAULT_RPS,
            burst: DEFAULT_RPS,
        }
    }
}

impl RateLimitConfig {
    /// Builds the limiter settings from optional raw values; `burst` follows `rps`
    /// when unset.
    pub fn parse(rps: Option<&str>, burst: Option<&str>) -> Result<Self> {
        let rps = match rps {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("RATE_LIMIT_RPS must be a non-negative integer")?,
            None => DEFAULT_RPS,
        };
        let burst = match burst {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("RATE_LIMIT_BURST must be a non-negative integer")?,
            None => rps,
        };
        Ok(Self { rps, burst })
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let rps = std::env::var("RATE_LIMIT_RPS").ok();
        let burst = std::env::var("RATE_LIMIT_BURST").ok();

        Ok(Config {
            api_session_url: require_env("API_SESSION_URL")?,
            api_job_search_url: require_env("API_JOB_SEARCH_URL")?,
            api_logout_url: require_env("API_LOGOUT_URL")?,
            login_email: require_env("LOGIN_EMAIL")?,
            login_password: require_env("LOGIN_PASSWORD")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            rate_limit: RateLimitConfig::parse(rps.as_deref(), burst.as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
