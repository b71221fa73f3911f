//! Table projection: re-indexes enriched jobs to the ranked order and derives the
//! display columns of the export.

use std::collections::HashMap;

use serde::Serialize;

use crate::board::models::{JobDetail, JobId, SalaryRange, PERCENTAGE_FEE_ID};
use crate::table::labels::{
    label_of, prefecture, BonusFrequency, BonusRecord, Coded, CommissionEarnedAt, Incentive,
    NightShift, Overtime, Position, Relocation, WorkStyle, UNKNOWN,
};

const LIST_SEPARATOR: &str = "、";

pub const COLUMNS: [&str; 24] = [
    "求人ID",
    "求人名",
    "募集企業名",
    "職種",
    "職位",
    "想定年収",
    "月給",
    "勤務地",
    "応募必須条件",
    "仕事内容",
    "賞与回数",
    "昨年度賞与実績",
    "インセンティブ",
    "年収例",
    "給与・年収例 補足情報",
    "勤務地詳細",
    "勤務形態",
    "転勤の可能性",
    "勤務時間",
    "夜間勤務",
    "月刊平均残業時間",
    "勤務地・勤務時間 補足情報",
    "成果報酬金額",
    "成果地点",
];

/// One exported row; `cells` line up with `COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRow {
    pub id: JobId,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<JobRow>,
}

impl JobTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows follow `order`; ids in `order` without a detail are skipped.
pub fn project(details: &[JobDetail], order: &[JobId]) -> JobTable {
    let by_id: HashMap<JobId, &JobDetail> = details.iter().rev().map(|d| (d.id, d)).collect();
    let rows = order
        .iter()
        .filter_map(|id| by_id.get(id))
        .map(|detail| project_row(detail))
        .collect();
    JobTable {
        columns: COLUMNS.to_vec(),
        rows,
    }
}

fn project_row(d: &JobDetail) -> JobRow {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    let occupation = d
        .occupations
        .as_ref()
        .and_then(|o| o.main)
        .map(|code| code.to_string())
        .unwrap_or_default();

    let locations = d
        .addresses
        .iter()
        .flatten()
        .filter_map(|a| a.prefecture)
        .map(prefecture)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);

    let work_hours = match d.work_hours.as_ref() {
        Some(h) if h.start.is_some() || h.end.is_some() => format!(
            "{}~{}",
            h.start.as_deref().unwrap_or_default(),
            h.end.as_deref().unwrap_or_default()
        ),
        _ => String::new(),
    };

    let cells = vec![
        d.id.to_string(),
        text(&d.name),
        d.company.as_ref().and_then(|c| c.name.clone()).unwrap_or_default(),
        occupation,
        join_labels::<Position>(d.positions.as_deref()),
        salary_range(d.expected_annual_salary.as_ref()),
        salary_range(d.expected_monthly_salary.as_ref()),
        locations,
        text(&d.minimum_qualification),
        text(&d.job_descriptions),
        label_of::<BonusFrequency>(d.frequency_of_bonus_payments).to_string(),
        label_of::<BonusRecord>(d.actual_bonus_payments_last_year).to_string(),
        label_of::<Incentive>(d.incentive).to_string(),
        text(&d.annual_salary_example),
        text(&d.salary_comments),
        text(&d.address_detail),
        join_labels::<WorkStyle>(d.work_styles.as_deref()),
        label_of::<Relocation>(d.relocation_probability).to_string(),
        work_hours,
        label_of::<NightShift>(d.night_time_shift).to_string(),
        label_of::<Overtime>(d.average_overtime).to_string(),
        text(&d.location_comments),
        commission(d),
        label_of::<CommissionEarnedAt>(d.commission_earned_at).to_string(),
    ];

    JobRow { id: d.id, cells }
}

fn join_labels<T: Coded>(codes: Option<&[i64]>) -> String {
    codes
        .unwrap_or_default()
        .iter()
        .map(|code| T::from_code(*code).map_or(UNKNOWN, T::label))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// `"{min}万円~{max}万円"`, or empty when neither bound is known.
fn salary_range(range: Option<&SalaryRange>) -> String {
    let Some(range) = range else {
        return String::new();
    };
    if range.min.is_none() && range.max.is_none() {
        return String::new();
    }
    let bound = |v: Option<f64>| v.map(|v| format!("{}万円", amount(v))).unwrap_or_default();
    format!("{}~{}", bound(range.min), bound(range.max))
}

/// Percentage fees render against theoretical annual salary, fixed fees in yen.
fn commission(d: &JobDetail) -> String {
    let Some(fee) = d.commission_fee.as_ref() else {
        return String::new();
    };
    let Some(value) = fee.fee else {
        return String::new();
    };
    if fee.id == Some(PERCENTAGE_FEE_ID) {
        format!("理論年収×{}%", amount(value))
    } else {
        format!("{}円", thousands(value.round() as i64))
    }
}

fn amount(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
