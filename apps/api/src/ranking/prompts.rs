// Prompt constants for the fit oracle.

/// System prompt for document-screening pass-rate grouping.
pub const FIT_RANKING_SYSTEM: &str = "You are a professional recruitment agent. \
    You estimate how likely a candidate is to pass document screening for each job, \
    by comparing the candidate's past occupations and years of experience against \
    each job's minimum qualifications.";

/// Ranking prompt template. Replace `{profile}` and `{jobs}` before sending.
pub const FIT_RANKING_PROMPT_TEMPLATE: &str = r#"Candidate occupations and years of experience:
{profile}

Jobs, as pairs of id and minimum qualification (minimumQualification):
{jobs}

Most important rules:
- Output every job id exactly once. Duplicates are forbidden.
- If a job could belong to several pass rates, put it only in the group with the highest rate.
- Before answering, check that no id appears twice.

Other rules:
- Judge every id you were given.
- Put jobs with the same pass rate into a single group.
- Sort the groups by pass rate, highest first.
- rate is a percentage between 0 and 100.

Return a JSON array with this EXACT shape:
[
  {"rate": 100, "ids": [111111, 222222]},
  {"rate": 80, "ids": [333333, 444444]}
]"#;
