//! Search criteria and their encoding as upstream query parameters.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// How the keyword terms are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicType {
    #[default]
    Or,
    And,
    ExcludeAnd,
    ExcludeOr,
}

/// The `commissionFeePercentage` floor sent with every list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeThreshold {
    Standard,
    /// Used when the standard threshold matches fewer than `MIN_RESULTS` jobs.
    Relaxed,
}

impl FeeThreshold {
    pub fn percentage(self) -> u8 {
        match self {
            FeeThreshold::Standard => 3,
            FeeThreshold::Relaxed => 2,
        }
    }
}

fn default_keyword_field() -> u8 {
    1
}

/// Immutable description of one search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub keyword: String,
    /// Upstream match-field selector, sent as `option`.
    #[serde(default = "default_keyword_field")]
    pub keyword_field: u8,
    #[serde(default)]
    pub logic: LogicType,
    /// Annual salary bounds in 万円.
    pub min_salary: Option<u32>,
    pub max_salary: Option<u32>,
    /// Prefecture codes (JIS X 0401).
    #[serde(default)]
    pub locations: Vec<u8>,
    /// Occupation codes.
    #[serde(default)]
    pub categories: Vec<u32>,
    #[serde(default)]
    pub holidays: Vec<u32>,
    #[serde(default)]
    pub work_environments: Vec<u32>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            keyword_field: default_keyword_field(),
            logic: LogicType::default(),
            min_salary: None,
            max_salary: None,
            locations: Vec::new(),
            categories: Vec::new(),
            holidays: Vec::new(),
            work_environments: Vec::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeywordQuery<'a> {
    option: u8,
    keyword: &'a str,
    logic_type: LogicType,
}

pub type QueryPairs = Vec<(&'static str, String)>;

impl FilterSet {
    pub fn validate(&self) -> Result<(), AppError> {
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(AppError::Validation(format!(
                    "min_salary ({min}) must not exceed max_salary ({max})"
                )));
            }
        }
        if let Some(bad) = self.locations.iter().find(|code| !(1..=47).contains(*code)) {
            return Err(AppError::Validation(format!(
                "unknown prefecture code {bad}"
            )));
        }
        Ok(())
    }

    /// Query parameters shared by the count query and every page query.
    /// Repeated facets become repeated keys.
    pub fn to_query(&self, threshold: FeeThreshold) -> Result<QueryPairs, AppError> {
        let q_json = serde_json::to_string(&KeywordQuery {
            option: self.keyword_field,
            keyword: &self.keyword,
            logic_type: self.logic,
        })
        .map_err(|e| AppError::Internal(e.into()))?;

        let mut pairs: QueryPairs = vec![
            ("qJson", q_json),
            ("selectionDaysIncludingDuringMeasurement", "true".to_string()),
        ];
        if let Some(max) = self.max_salary {
            pairs.push(("annualSalary.max", max.to_string()));
        }
        if let Some(min) = self.min_salary {
            pairs.push(("annualSalary.min", min.to_string()));
        }
        pairs.push((
            "commissionFeePercentage",
            threshold.percentage().to_string(),
        ));
        pairs.extend(self.locations.iter().map(|c| ("prefectures", c.to_string())));
        pairs.extend(self.holidays.iter().map(|c| ("holidays", c.to_string())));
        pairs.extend(
            self.work_environments
                .iter()
                .map(|c| ("workEnvironments", c.to_string())),
        );
        pairs.extend(self.categories.iter().map(|c| ("occupations", c.to_string())));
        Ok(pairs)
    }
}
