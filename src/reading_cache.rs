use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::dataset::Reading;

/// In-memory store of loaded record sets, keyed by source identifier
/// (the local path or the remote URL that produced them).
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Entries never expire; callers clear the cache explicitly.
#[derive(Clone, Default)]
pub struct ReadingCache {
    inner: Arc<RwLock<HashMap<String, Arc<Vec<Reading>>>>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached record set for `source`.
    pub async fn insert(&self, source: &str, readings: Arc<Vec<Reading>>) {
        self.inner
            .write()
            .await
            .insert(source.to_owned(), readings);
    }

    /// Return the cached record set for `source`, if present.
    pub async fn get(&self, source: &str) -> Option<Arc<Vec<Reading>>> {
        self.inner.read().await.get(source).cloned()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}
