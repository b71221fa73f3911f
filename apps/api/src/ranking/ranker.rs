//! Match ranking: one strict, duplicate-free order over every enriched job.
//!
//! Without a candidate profile the order is commission fee, highest first. With a
//! profile the oracle's groups are consumed in the order received:
//! 1. drop ids already emitted by an earlier group (first occurrence wins) and ids
//!    not in the dataset
//! 2. order the survivors by fee, highest first
//! 3. append
//!
//! Jobs the oracle never mentioned follow last, again by fee. Fee ties keep dataset
//! order and a missing fee sorts after every present one.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{info, warn};

use crate::board::models::{JobDetail, JobId};
use crate::errors::AppError;
use crate::ranking::oracle::{Candidate, CandidateProfile, FitOracle, RankGroup};

pub async fn rank(
    oracle: &dyn FitOracle,
    profile: &CandidateProfile,
    dataset: &[JobDetail],
) -> Result<Vec<JobId>, AppError> {
    let jobs = distinct(dataset);

    if profile.is_empty() || jobs.is_empty() {
        return Ok(sort_by_fee(&jobs, |_| true));
    }

    let candidates: Vec<Candidate> = jobs
        .iter()
        .map(|job| Candidate {
            id: job.id,
            minimum_qualification: job.minimum_qualification.clone().unwrap_or_default(),
        })
        .collect();

    let groups = oracle.classify(profile, &candidates).await?;
    info!("Fit oracle returned {} groups", groups.len());
    Ok(merge_groups(&groups, &jobs))
}

/// Folds oracle groups and the fee key into one order over `jobs`.
pub fn merge_groups(groups: &[RankGroup], jobs: &[&JobDetail]) -> Vec<JobId> {
    let known: HashSet<JobId> = jobs.iter().map(|job| job.id).collect();
    let mut emitted: HashSet<JobId> = HashSet::with_capacity(jobs.len());
    let mut order = Vec::with_capacity(jobs.len());
    let mut repeated = 0usize;
    let mut unknown = 0usize;

    for group in groups {
        let mut fresh = HashSet::with_capacity(group.ids.len());
        for id in &group.ids {
            if !known.contains(id) {
                unknown += 1;
            } else if emitted.insert(*id) {
                fresh.insert(*id);
            } else {
                repeated += 1;
            }
        }
        if !fresh.is_empty() {
            order.extend(sort_by_fee(jobs, |id| fresh.contains(&id)));
        }
    }

    if repeated > 0 || unknown > 0 {
        warn!("Fit oracle repeated {repeated} ids and invented {unknown} ids");
    }

    order.extend(sort_by_fee(jobs, |id| !emitted.contains(&id)));
    order
}

/// Ids of the jobs selected by `keep`, highest fee first, stable on ties.
fn sort_by_fee(jobs: &[&JobDetail], keep: impl Fn(JobId) -> bool) -> Vec<JobId> {
    let mut selected: Vec<&JobDetail> = jobs.iter().copied().filter(|job| keep(job.id)).collect();
    selected.sort_by(|a, b| fee_descending(a.fee(), b.fee()));
    selected.into_iter().map(|job| job.id).collect()
}

fn fee_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// First occurrence of each id, in dataset order.
fn distinct(dataset: &[JobDetail]) -> Vec<&JobDetail> {
    let mut seen = HashSet::with_capacity(dataset.len());
    dataset.iter().filter(|job| seen.insert(job.id)).collect()
}
