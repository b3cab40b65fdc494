use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::Reading;

/// User-selected filter. Every `None` bound falls back to the matching
/// [`DatasetBounds`] value of the record set being filtered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FilterCriteria {
    /// First date to include (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Last date to include (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Keep only readings with the AC on.
    pub ac_only: bool,
    /// Keep only readings with the fan on.
    pub fan_only: bool,
    /// Lowest temperature to include (inclusive, °C).
    pub temp_min: Option<f64>,
    /// Highest temperature to include (inclusive, °C).
    pub temp_max: Option<f64>,
}

/// Date and temperature extent of a non-empty record set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct DatasetBounds {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl DatasetBounds {
    /// Returns `None` for an empty record set.
    pub fn of(records: &[Reading]) -> Option<Self> {
        let first = records.first()?;
        let init = Self {
            start_date: first.date(),
            end_date: first.date(),
            temp_min: first.temperature,
            temp_max: first.temperature,
        };

        Some(records.iter().skip(1).fold(init, |b, r| Self {
            start_date: b.start_date.min(r.date()),
            end_date: b.end_date.max(r.date()),
            temp_min: b.temp_min.min(r.temperature),
            temp_max: b.temp_max.max(r.temperature),
        }))
    }
}

/// Criteria with every bound filled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ResolvedCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ac_only: bool,
    pub fan_only: bool,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl ResolvedCriteria {
    pub fn matches(&self, r: &Reading) -> bool {
        let date = r.date();
        self.start_date <= date
            && date <= self.end_date
            && (!self.ac_only || r.ac_status)
            && (!self.fan_only || r.fan_status)
            && self.temp_min <= r.temperature
            && r.temperature <= self.temp_max
    }
}

impl FilterCriteria {
    /// Fill the unset bounds from `bounds`.
    pub fn resolve(&self, bounds: &DatasetBounds) -> ResolvedCriteria {
        ResolvedCriteria {
            start_date: self.start_date.unwrap_or(bounds.start_date),
            end_date: self.end_date.unwrap_or(bounds.end_date),
            ac_only: self.ac_only,
            fan_only: self.fan_only,
            temp_min: self.temp_min.unwrap_or(bounds.temp_min),
            temp_max: self.temp_max.unwrap_or(bounds.temp_max),
        }
    }
}

/// Return the readings matching every predicate of `criteria`, in input order.
///
/// An empty input or an inverted range yields an empty view.
pub fn filter(records: &[Reading], criteria: &FilterCriteria) -> Vec<Reading> {
    let Some(bounds) = DatasetBounds::of(records) else {
        return Vec::new();
    };
    let resolved = criteria.resolve(&bounds);

    records
        .iter()
        .filter(|r| resolved.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::model::parse_timestamp;

    fn r(ts: &str, temperature: f64, ac: bool, fan: bool) -> Reading {
        Reading::new(parse_timestamp(ts).unwrap(), temperature, ac, fan).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn scenario() -> Vec<Reading> {
        vec![
            r("2025-01-01 00:00:00", 20.0, true, false),
            r("2025-01-01 01:00:00", 22.0, false, true),
        ]
    }

    fn spread() -> Vec<Reading> {
        vec![
            r("2025-01-03 05:00:00", 25.0, true, true),
            r("2025-01-01 23:00:00", 18.5, false, false),
            r("2025-01-02 12:00:00", 21.0, true, false),
            r("2025-01-04 00:00:00", 30.0, false, true),
        ]
    }

    #[test]
    fn ac_only_keeps_ac_rows() {
        let view = filter(
            &scenario(),
            &FilterCriteria {
                ac_only: true,
                ..Default::default()
            },
        );
        assert_eq!(view, vec![r("2025-01-01 00:00:00", 20.0, true, false)]);
    }

    #[test]
    fn fan_only_keeps_fan_rows() {
        let view = filter(
            &spread(),
            &FilterCriteria {
                fan_only: true,
                ..Default::default()
            },
        );
        let temps: Vec<f64> = view.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![25.0, 30.0]);
    }

    #[test]
    fn default_criteria_return_everything_in_input_order() {
        let records = spread();
        assert_eq!(filter(&records, &FilterCriteria::default()), records);
    }

    #[test]
    fn explicit_full_range_returns_everything() {
        let records = spread();
        let bounds = DatasetBounds::of(&records).unwrap();
        let criteria = FilterCriteria {
            start_date: Some(bounds.start_date),
            end_date: Some(bounds.end_date),
            temp_min: Some(bounds.temp_min),
            temp_max: Some(bounds.temp_max),
            ..Default::default()
        };
        assert_eq!(filter(&records, &criteria), records);
    }

    #[test]
    fn date_range_ignores_time_of_day() {
        let view = filter(
            &spread(),
            &FilterCriteria {
                start_date: Some(date("2025-01-01")),
                end_date: Some(date("2025-01-01")),
                ..Default::default()
            },
        );
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].temperature, 18.5);
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        let view = filter(
            &spread(),
            &FilterCriteria {
                temp_min: Some(21.0),
                temp_max: Some(25.0),
                ..Default::default()
            },
        );
        let temps: Vec<f64> = view.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![25.0, 21.0]);
    }

    #[test]
    fn inverted_temperature_range_is_empty() {
        let view = filter(
            &spread(),
            &FilterCriteria {
                temp_min: Some(26.0),
                temp_max: Some(20.0),
                ..Default::default()
            },
        );
        assert!(view.is_empty());
    }

    #[test]
    fn inverted_date_range_is_empty() {
        let view = filter(
            &spread(),
            &FilterCriteria {
                start_date: Some(date("2025-01-04")),
                end_date: Some(date("2025-01-01")),
                ..Default::default()
            },
        );
        assert!(view.is_empty());
    }

    #[test]
    fn predicates_combine_as_conjunction() {
        let view = filter(
            &spread(),
            &FilterCriteria {
                start_date: Some(date("2025-01-02")),
                ac_only: true,
                fan_only: true,
                ..Default::default()
            },
        );
        assert_eq!(view, vec![r("2025-01-03 05:00:00", 25.0, true, true)]);
    }

    #[test]
    fn empty_input_yields_empty_view() {
        assert!(filter(&[], &FilterCriteria::default()).is_empty());
    }

    #[test]
    fn filter_does_not_touch_input() {
        let records = spread();
        let before = records.clone();
        let _ = filter(
            &records,
            &FilterCriteria {
                ac_only: true,
                ..Default::default()
            },
        );
        assert_eq!(records, before);
    }

    #[test]
    fn bounds_cover_dates_and_temperatures() {
        let b = DatasetBounds::of(&spread()).unwrap();
        assert_eq!(b.start_date, date("2025-01-01"));
        assert_eq!(b.end_date, date("2025-01-04"));
        assert_eq!(b.temp_min, 18.5);
        assert_eq!(b.temp_max, 30.0);
        assert!(DatasetBounds::of(&[]).is_none());
    }
}
