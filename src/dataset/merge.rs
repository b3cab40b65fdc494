use std::{collections::BTreeMap, path::Path};

use chrono::NaiveDateTime;
use tokio::fs;
use tracing::info;

use super::{csv_format, model::Reading};
use crate::error::WriteError;

/// Fold `incoming` into `existing`.
///
/// Exactly one reading survives per timestamp: the first one seen when
/// `existing` is walked before `incoming`, so existing data wins on conflict.
/// The result is sorted ascending by timestamp.
pub fn merge(existing: &[Reading], incoming: &[Reading]) -> Vec<Reading> {
    let mut by_timestamp: BTreeMap<NaiveDateTime, &Reading> = BTreeMap::new();
    for reading in existing.iter().chain(incoming) {
        by_timestamp.entry(reading.timestamp).or_insert(reading);
    }
    by_timestamp.into_values().cloned().collect()
}

/// Overwrite `path` with `records` in the dataset CSV layout.
pub async fn persist(records: &[Reading], path: &Path) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let body = csv_format::encode(records).map_err(io_err)?;
    fs::write(path, body).await.map_err(io_err)?;

    info!(path = %path.display(), records = records.len(), "Dataset persisted");
    Ok(())
}
