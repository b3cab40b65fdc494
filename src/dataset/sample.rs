use chrono::{NaiveDate, NaiveTime};

use super::model::Reading;

/// Generate 24 hourly readings for `day`, used to seed or exercise a dataset.
///
/// | Hour | Temperature  | AC  | Fan |
/// |------|--------------|-----|-----|
/// | even | 22 + h % 3   | on  | off |
/// | odd  | 22 + h % 3   | off | on  |
pub fn sample_day(day: NaiveDate) -> Vec<Reading> {
    (0..24u32)
        .filter_map(|hour| {
            let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
            Some(Reading {
                timestamp: day.and_time(time),
                temperature: f64::from(22 + hour % 3),
                ac_status: hour % 2 == 0,
                fan_status: hour % 2 == 1,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_one_reading_per_hour() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let readings = sample_day(day);

        assert_eq!(readings.len(), 24);
        assert!(readings.iter().all(|r| r.date() == day));
        assert!(readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn alternates_ac_and_fan() {
        let readings = sample_day(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());

        assert_eq!(readings[0].temperature, 22.0);
        assert_eq!(readings[1].temperature, 23.0);
        assert_eq!(readings[2].temperature, 24.0);
        assert_eq!(readings[3].temperature, 22.0);
        assert!(readings[0].ac_status && !readings[0].fan_status);
        assert!(!readings[1].ac_status && readings[1].fan_status);
    }
}
