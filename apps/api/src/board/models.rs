use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable numeric job identifier shared by summaries, details, rankings and rows.
pub type JobId = i64;

/// One record of a paginated list response. Only `id` is interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// List/count response: `{jobs: [...], total: N}`.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Company {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Occupations {
    pub main: Option<i64>,
}

/// Salary bounds in 万円.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub prefecture: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkHours {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Commission paid on placement. `id == 1` means `fee` is a percentage of the
/// theoretical annual salary; any other id means a fixed yen amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionFee {
    pub id: Option<i64>,
    pub fee: Option<f64>,
}

pub const PERCENTAGE_FEE_ID: i64 = 1;

/// Full job record returned by a single-`id` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub id: JobId,
    pub name: Option<String>,
    pub company: Option<Company>,
    pub occupations: Option<Occupations>,
    pub expected_annual_salary: Option<SalaryRange>,
    pub expected_monthly_salary: Option<SalaryRange>,
    pub addresses: Option<Vec<Address>>,
    pub positions: Option<Vec<i64>>,
    pub frequency_of_bonus_payments: Option<i64>,
    pub actual_bonus_payments_last_year: Option<i64>,
    pub incentive: Option<i64>,
    pub work_styles: Option<Vec<i64>>,
    pub relocation_probability: Option<i64>,
    pub work_hours: Option<WorkHours>,
    pub night_time_shift: Option<i64>,
    pub average_overtime: Option<i64>,
    pub commission_fee: Option<CommissionFee>,
    pub commission_earned_at: Option<i64>,
    pub minimum_qualification: Option<String>,
    pub job_descriptions: Option<String>,
    pub annual_salary_example: Option<String>,
    pub salary_comments: Option<String>,
    pub address_detail: Option<String>,
    pub location_comments: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobDetail {
    /// The deterministic secondary sort key used by every ranking path.
    pub fn fee(&self) -> Option<f64> {
        self.commission_fee.as_ref().and_then(|c| c.fee)
    }
}
