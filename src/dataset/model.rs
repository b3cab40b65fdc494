use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;

/// Timestamp layout used when writing the dataset back to CSV. The fraction
/// is only written for sub-second timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Layouts accepted when reading a timestamp, tried in order.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// One hourly observation.
///
/// Readings are keyed by `timestamp`: a persisted record set holds at most
/// one reading per timestamp, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Degrees Celsius, always finite.
    pub temperature: f64,
    pub ac_status: bool,
    pub fan_status: bool,
}

impl Reading {
    pub fn new(
        timestamp: NaiveDateTime,
        temperature: f64,
        ac_status: bool,
        fan_status: bool,
    ) -> Result<Self, ValidationError> {
        if !temperature.is_finite() {
            return Err(ValidationError::BadTemperature(temperature.to_string()));
        }
        Ok(Self {
            timestamp,
            temperature,
            ac_status,
            fan_status,
        })
    }

    /// Build a reading from the four raw CSV fields.
    pub fn from_fields(
        timestamp: &str,
        temperature: &str,
        ac_status: &str,
        fan_status: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            timestamp: parse_timestamp(timestamp)?,
            temperature: parse_temperature(temperature)?,
            ac_status: parse_status(ac_status)?,
            fan_status: parse_status(fan_status)?,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let s = raw.trim();

    for fmt in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }

    // Offset-aware input is normalised to UTC and stored naive.
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_utc());
    }

    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    Err(ValidationError::BadTimestamp(raw.to_owned()))
}

pub fn parse_temperature(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::BadTemperature(raw.to_owned())),
    }
}

/// Coerce `0`/`1`, `ON`/`OFF`, `true`/`false` and `yes`/`no` (any case).
pub fn parse_status(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "on" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "off" | "false" | "no" => Ok(false),
        _ => Err(ValidationError::BadStatus(raw.to_owned())),
    }
}

/// Encode a status flag the way the CSV stores it (`false` → 0, `true` → 1).
#[inline]
pub(crate) fn encode_status(v: bool) -> &'static str {
    if v {
        "1"
    } else {
        "0"
    }
}
