//! Total-match counting with the minimum-result relaxation rule.

use serde::Serialize;
use tracing::info;

use crate::board::auth::AuthSession;
use crate::board::filters::{FeeThreshold, FilterSet};
use crate::board::models::SearchPage;
use crate::board::{decode, ensure_accepted};
use crate::errors::AppError;

/// Below this many matches the fee threshold is relaxed once.
pub const MIN_RESULTS: u64 = 20;


/// The threshold a search runs under and the total it yields. Paging reuses
/// this so the pages cover exactly the count shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountResolution {
    #[serde(rename = "fee_threshold", serialize_with = "serialize_threshold")]
    pub threshold: FeeThreshold,
    pub total: u64,
}

fn serialize_threshold<S: serde::Serializer>(t: &FeeThreshold, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(t.percentage())
}

/// Counts matches at the standard threshold, re-counting once at the relaxed
/// threshold when fewer than `MIN_RESULTS` match.
pub async fn resolve_count(
    session: &AuthSession,
    filters: &FilterSet,
) -> Result<CountResolution, AppError> {
    let standard = count_at(session, filters, FeeThreshold::Standard).await?;
    if standard >= MIN_RESULTS {
        return Ok(CountResolution {
            threshold: FeeThreshold::Standard,
            total: standard,
        });
    }

    let relaxed = count_at(session, filters, FeeThreshold::Relaxed).await?;
    info!("Only {standard} matches at standard fee threshold; relaxed count is {relaxed}");
    Ok(CountResolution {
        threshold: FeeThreshold::Relaxed,
        total: relaxed,
    })
}

pub async fn count(session: &AuthSession, filters: &FilterSet) -> Result<u64, AppError> {
    Ok(resolve_count(session, filters).await?.total)
}

async fn count_at(
    session: &AuthSession,
    filters: &FilterSet,
    threshold: FeeThreshold,
) -> Result<u64, AppError> {
    let query = filters.to_query(threshold)?;
    let response = session
        .search()
        .query(&query)
        .timeout(session.timeouts().count)
        .send()
        .await
        .map_err(|e| AppError::from_transport("count", e))?;

    info!("Count status: {}", response.status());
    let response = ensure_accepted(response).await?;
    let page: SearchPage = decode(response, "count").await?;
    page.total.ok_or_else(|| AppError::Upstream {
        status: 200,
        message: "count response carried no total".to_string(),
    })
}
