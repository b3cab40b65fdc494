use std::{collections::HashSet, io, sync::Arc};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    dataset::{
        csv_format, filter, merge, persist, summarize, DatasetBounds, DatasetLoader,
        FilterCriteria, Reading, ResolvedCriteria, Summary,
    },
    error::{LoadError, ValidationError, WriteError},
};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to encode export")]
    Encode(#[source] io::Error),
    #[error("dataset has {dropped} invalid row(s), first at line {first_line}; refusing to overwrite it")]
    InvalidRows { dropped: usize, first_line: usize },
}

/// One interaction: the current filter plus an optional reading to add first.
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    pub criteria: FilterCriteria,
    pub new_reading: Option<Reading>,
}

/// Everything a presentation layer needs to render one interaction.
#[derive(Debug, Clone)]
pub struct DashboardResponse {
    /// Size of the full record set.
    pub total_records: usize,
    /// Extent of the full record set; the defaults for unset filter bounds.
    pub bounds: Option<DatasetBounds>,
    /// The filter actually applied, `None` when the record set is empty.
    pub criteria: Option<ResolvedCriteria>,
    pub view: Vec<Reading>,
    pub summary: Summary,
    /// Present when the request carried a new reading.
    pub merge: Option<MergeOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Readings whose timestamp was not in the dataset yet.
    pub added: usize,
    /// Incoming readings discarded because the dataset already held their timestamp.
    pub ignored: usize,
    pub total_records: usize,
}

/// Load → filter → summarize, and add → merge → persist, over one dataset.
///
/// Cheap to clone; clones share the loader cache and the write lock.
#[derive(Clone)]
pub struct DashboardService {
    inner: Arc<Inner>,
}

struct Inner {
    loader: DatasetLoader,
    /// Serialises read-merge-persist cycles within this process.
    write_lock: Mutex<()>,
}

impl DashboardService {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// The full record set.
    pub async fn records(&self) -> Result<Arc<Vec<Reading>>, DashboardError> {
        Ok(self.inner.loader.load().await?)
    }

    /// Filtered view, bounds and summary for `criteria`.
    pub async fn view(&self, criteria: &FilterCriteria) -> Result<DashboardResponse, DashboardError> {
        let records = self.records().await?;
        let bounds = DatasetBounds::of(&records);
        let view = filter(&records, criteria);

        Ok(DashboardResponse {
            total_records: records.len(),
            bounds,
            criteria: bounds.map(|b| criteria.resolve(&b)),
            summary: summarize(&view),
            view,
            merge: None,
        })
    }

    /// The filtered view in the dataset CSV layout.
    pub async fn export_csv(&self, criteria: &FilterCriteria) -> Result<String, DashboardError> {
        let records = self.records().await?;
        let view = filter(&records, criteria);
        csv_format::encode(&view).map_err(DashboardError::Encode)
    }

    pub async fn add_reading(&self, reading: Reading) -> Result<MergeOutcome, DashboardError> {
        self.import(vec![reading]).await
    }

    /// Merge `incoming` into the persisted dataset. Existing readings win on
    /// conflicting timestamps.
    ///
    /// Fails with [`DashboardError::InvalidRows`] and leaves the file alone when
    /// the current dataset has rows that did not validate, since rewriting it
    /// would drop them.
    pub async fn import(&self, incoming: Vec<Reading>) -> Result<MergeOutcome, DashboardError> {
        let _guard = self.inner.write_lock.lock().await;
        let loader = &self.inner.loader;

        let existing = match loader.load_fresh().await {
            Ok(decoded) => {
                if let Some(first) = decoded.row_errors.first() {
                    warn!(
                        path = %loader.local_path().display(),
                        dropped = decoded.row_errors.len(),
                        first_line = first.line,
                        "Refusing to rewrite dataset with invalid rows"
                    );
                    return Err(DashboardError::InvalidRows {
                        dropped: decoded.row_errors.len(),
                        first_line: first.line,
                    });
                }
                decoded.readings
            }
            Err(LoadError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let known: HashSet<_> = existing.iter().map(|r| r.timestamp).collect();

        let merged = merge(&existing, &incoming);
        persist(&merged, loader.local_path()).await?;
        loader.invalidate().await;

        let added = merged.len() - known.len();
        let outcome = MergeOutcome {
            added,
            ignored: incoming.len() - added,
            total_records: merged.len(),
        };
        info!(
            added = outcome.added,
            ignored = outcome.ignored,
            total = outcome.total_records,
            "Readings merged into dataset"
        );
        Ok(outcome)
    }

    pub async fn invalidate_cache(&self) {
        self.inner.loader.invalidate().await;
    }

    /// Apply the optional new reading, then compute the view.
    pub async fn handle(&self, request: DashboardRequest) -> Result<DashboardResponse, DashboardError> {
        let merge = match request.new_reading {
            Some(reading) => Some(self.add_reading(reading).await?),
            None => None,
        };

        let mut response = self.view(&request.criteria).await?;
        response.merge = merge;
        Ok(response)
    }
}
