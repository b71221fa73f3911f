//! Fit oracle: pluggable judge that groups jobs by estimated screening pass rate.
//!
//! Default: `LlmFitOracle` (Claude via `LlmClient`). Tests use fixed stubs so the
//! merge in `ranker` can be exercised deterministically.
//!
//! The oracle promises each id once, highest group first, but the ranker never
//! relies on the first half of that promise.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::models::JobId;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::ranking::prompts::{FIT_RANKING_PROMPT_TEMPLATE, FIT_RANKING_SYSTEM};

/// Occupation label → years of experience. Empty means "rank by fee only".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateProfile(pub BTreeMap<String, u32>);

impl CandidateProfile {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The minimal per-job text handed to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: JobId,
    pub minimum_qualification: String,
}

/// One pass-rate bucket as returned by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankGroup {
    pub rate: f64,
    pub ids: Vec<JobId>,
}

/// Implement this to swap the judging backend without touching the ranker.
///
/// Carried in `AppState` as `Arc<dyn FitOracle>`.
#[async_trait]
pub trait FitOracle: Send + Sync {
    async fn classify(
        &self,
        profile: &CandidateProfile,
        candidates: &[Candidate],
    ) -> Result<Vec<RankGroup>, AppError>;
}

pub struct LlmFitOracle(pub LlmClient);

#[async_trait]
impl FitOracle for LlmFitOracle {
    async fn classify(
        &self,
        profile: &CandidateProfile,
        candidates: &[Candidate],
    ) -> Result<Vec<RankGroup>, AppError> {
        let prompt = build_prompt(profile, candidates)?;
        let system = format!("{FIT_RANKING_SYSTEM} {JSON_ONLY_INSTRUCTION}");

        info!("Asking fit oracle to judge {} jobs", candidates.len());
        self.0
            .call_json::<Vec<RankGroup>>(&prompt, &system)
            .await
            .map_err(|e| match e {
                LlmError::Parse(err) => {
                    AppError::Ranking(format!("oracle answer is not [{{rate, ids}}]: {err}"))
                }
                LlmError::EmptyContent => AppError::Ranking("oracle returned no text".to_string()),
                other => AppError::Llm(format!("fit ranking call failed: {other}")),
            })
    }
}

fn build_prompt(profile: &CandidateProfile, candidates: &[Candidate]) -> Result<String, AppError> {
    let profile_json =
        serde_json::to_string(profile).map_err(|e| AppError::Internal(e.into()))?;
    let jobs_json =
        serde_json::to_string_pretty(candidates).map_err(|e| AppError::Internal(e.into()))?;
    Ok(FIT_RANKING_PROMPT_TEMPLATE
        .replace("{profile}", &profile_json)
        .replace("{jobs}", &jobs_json))
}
