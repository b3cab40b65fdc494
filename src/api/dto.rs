use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dashboard::{DashboardResponse, MergeOutcome},
    dataset::{
        model::{parse_status, parse_temperature, parse_timestamp},
        DatasetBounds, FilterCriteria, Reading, ResolvedCriteria, Summary,
    },
    error::ValidationError,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingDto {
    pub timestamp: NaiveDateTime,
    /// Degrees Celsius
    pub temperature: f64,
    pub ac_status: bool,
    pub fan_status: bool,
}

impl From<Reading> for ReadingDto {
    fn from(r: Reading) -> Self {
        Self {
            timestamp: r.timestamp,
            temperature: r.temperature,
            ac_status: r.ac_status,
            fan_status: r.fan_status,
        }
    }
}

/// A raw scalar as typed into a form: `20`, `"20.5"`, `true`, `"ON"`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    fn as_text(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

/// Request body for `POST /readings`. Values are coerced the same way as
/// CSV fields.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewReadingRequest {
    /// e.g. `2025-01-01 13:00:00`
    pub timestamp: String,
    pub temperature: RawValue,
    pub ac_status: RawValue,
    pub fan_status: RawValue,
}

impl TryFrom<NewReadingRequest> for Reading {
    type Error = ValidationError;

    fn try_from(req: NewReadingRequest) -> Result<Self, Self::Error> {
        let temperature = match req.temperature {
            RawValue::Number(n) => n,
            RawValue::Text(s) => parse_temperature(&s)?,
            RawValue::Bool(b) => return Err(ValidationError::BadTemperature(b.to_string())),
        };

        Reading::new(
            parse_timestamp(&req.timestamp)?,
            temperature,
            parse_status(&req.ac_status.as_text())?,
            parse_status(&req.fan_status.as_text())?,
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MergeOutcomeDto {
    pub inserted: bool,
    pub added: usize,
    pub ignored: usize,
    pub total_records: usize,
}

impl From<MergeOutcome> for MergeOutcomeDto {
    fn from(m: MergeOutcome) -> Self {
        Self {
            inserted: m.added > 0,
            added: m.added,
            ignored: m.ignored,
            total_records: m.total_records,
        }
    }
}

/// Request body for `POST /dashboard`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardRequestDto {
    #[serde(default)]
    pub criteria: FilterCriteria,
    pub new_reading: Option<NewReadingRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponseDto {
    pub total_records: usize,
    pub bounds: Option<DatasetBounds>,
    pub criteria: Option<ResolvedCriteria>,
    pub summary: Summary,
    /// Filtered readings in dataset order.
    pub view: Vec<ReadingDto>,
    pub merge: Option<MergeOutcomeDto>,
}

impl From<DashboardResponse> for DashboardResponseDto {
    fn from(r: DashboardResponse) -> Self {
        Self {
            total_records: r.total_records,
            bounds: r.bounds,
            criteria: r.criteria,
            summary: r.summary,
            view: r.view.into_iter().map(Into::into).collect(),
            merge: r.merge.map(Into::into),
        }
    }
}
