//! Decoding and encoding of the four-column dataset CSV.
//!
//! The same layout is used for the remote source, the persisted local copy
//! and the filtered-view export:
//!
//! ```text
//! Timestamp,Temperature,AC_Status,Fan_Status
//! 2025-01-01 00:00:00,20.5,1,0
//! ```

use std::{collections::HashMap, io};

use csv::StringRecord;
use thiserror::Error;
use tracing::warn;

use super::model::{encode_status, Reading, TIMESTAMP_FORMAT};
use crate::error::ValidationError;

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_TEMPERATURE: &str = "Temperature";
pub const COL_AC_STATUS: &str = "AC_Status";
pub const COL_FAN_STATUS: &str = "Fan_Status";

pub const HEADER: [&str; 4] = [COL_TIMESTAMP, COL_TEMPERATURE, COL_AC_STATUS, COL_FAN_STATUS];

/// A data row that was skipped because one of its fields failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the source text (the header is line 1).
    pub line: usize,
    pub error: ValidationError,
}

#[derive(Debug, Clone, Default)]
pub struct Decoded {
    /// Valid rows in source order.
    pub readings: Vec<Reading>,
    pub row_errors: Vec<RowError>,
}

/// Failure that makes the whole payload unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("malformed CSV: {0}")]
    Malformed(String),
}

struct Columns {
    timestamp: usize,
    temperature: usize,
    ac_status: usize,
    fan_status: usize,
}

/// Decode CSV bytes into readings.
///
/// Rows with an invalid field are dropped and reported in
/// [`Decoded::row_errors`]; only structural problems fail the decode.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| DecodeError::Malformed(e.to_string()))?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut decoded = Decoded::default();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| DecodeError::Malformed(format!("line {line}: {e}")))?;

        let field = |i: usize| record.get(i).unwrap_or("");
        match Reading::from_fields(
            field(columns.timestamp),
            field(columns.temperature),
            field(columns.ac_status),
            field(columns.fan_status),
        ) {
            Ok(reading) => decoded.readings.push(reading),
            Err(error) => {
                warn!(line, error = %error, "Dropping invalid dataset row");
                decoded.row_errors.push(RowError { line, error });
            }
        }
    }

    Ok(decoded)
}

/// Encode readings with the fixed header, in the order given.
pub fn encode(readings: &[Reading]) -> io::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for r in readings {
        writer.write_record([
            r.timestamp.format(TIMESTAMP_FORMAT).to_string().as_str(),
            r.temperature.to_string().as_str(),
            encode_status(r.ac_status),
            encode_status(r.fan_status),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn resolve_columns(headers: &StringRecord) -> Result<Columns, DecodeError> {
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().trim_start_matches('\u{feff}'), i))
        .collect();

    let missing: Vec<&'static str> = HEADER
        .iter()
        .copied()
        .filter(|col| !index.contains_key(col))
        .collect();
    if !missing.is_empty() {
        return Err(DecodeError::MissingColumns(missing));
    }

    Ok(Columns {
        timestamp: index[COL_TIMESTAMP],
        temperature: index[COL_TEMPERATURE],
        ac_status: index[COL_AC_STATUS],
        fan_status: index[COL_FAN_STATUS],
    })
}
