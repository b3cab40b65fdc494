use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::model::Reading;

/// Descriptive statistics of one numeric column.
///
/// Every value is `None` when it is undefined for the sample (empty input,
/// or `std` of a single value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FieldSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n − 1 denominator).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSummary {
    pub fn describe(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = (count > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });

        Self {
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            q25: Some(quantile(&sorted, 0.25)),
            median: Some(quantile(&sorted, 0.5)),
            q75: Some(quantile(&sorted, 0.75)),
            max: sorted.last().copied(),
        }
    }
}

/// Summary of a record set or view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Summary {
    pub count: usize,
    pub temperature: FieldSummary,
    /// AC flag as 0/1.
    pub ac_status: FieldSummary,
    /// Fan flag as 0/1.
    pub fan_status: FieldSummary,
    pub average_temperature: Option<f64>,
    pub ac_on_count: usize,
    pub fan_on_count: usize,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

pub fn summarize(records: &[Reading]) -> Summary {
    let flag = |v: bool| if v { 1.0 } else { 0.0 };
    let temperature = FieldSummary::describe(records.iter().map(|r| r.temperature));

    Summary {
        count: records.len(),
        average_temperature: temperature.mean,
        temperature,
        ac_status: FieldSummary::describe(records.iter().map(|r| flag(r.ac_status))),
        fan_status: FieldSummary::describe(records.iter().map(|r| flag(r.fan_status))),
        ac_on_count: records.iter().filter(|r| r.ac_status).count(),
        fan_on_count: records.iter().filter(|r| r.fan_status).count(),
        first_timestamp: records.iter().map(|r| r.timestamp).min(),
        last_timestamp: records.iter().map(|r| r.timestamp).max(),
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
