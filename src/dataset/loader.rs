use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::fs;
use tracing::{debug, info, warn};

use super::{
    csv_format::{self, Decoded},
    model::Reading,
};
use crate::{error::LoadError, reading_cache::ReadingCache, remote::RemoteSource};

/// Where a record set is read from.
#[derive(Debug, Clone)]
enum Source<'a> {
    Local(&'a Path),
    Remote(&'a RemoteSource),
}

impl Source<'_> {
    fn id(&self) -> String {
        match self {
            Source::Local(path) => path.display().to_string(),
            Source::Remote(remote) => remote.url().to_owned(),
        }
    }
}

/// Loads the dataset from the local persisted file, falling back to the
/// remote URL when the file does not exist.
///
/// Loaded record sets are kept in a [`ReadingCache`] keyed by the source they
/// came from until [`DatasetLoader::invalidate`] is called.
#[derive(Clone)]
pub struct DatasetLoader {
    local_path: PathBuf,
    remote: Option<RemoteSource>,
    cache: ReadingCache,
}

impl DatasetLoader {
    pub fn new(local_path: impl Into<PathBuf>, remote: Option<RemoteSource>) -> Self {
        Self {
            local_path: local_path.into(),
            remote,
            cache: ReadingCache::new(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Load the record set, serving it from the cache when the selected
    /// source has been read before.
    pub async fn load(&self) -> Result<Arc<Vec<Reading>>, LoadError> {
        let source = self.select_source().await?;
        let id = source.id();

        if let Some(cached) = self.cache.get(&id).await {
            debug!(source = %id, records = cached.len(), "Dataset served from cache");
            return Ok(cached);
        }

        let readings = Arc::new(self.read(&source).await?.readings);
        self.cache.insert(&id, readings.clone()).await;
        Ok(readings)
    }

    /// Load the record set without consulting or filling the cache.
    ///
    /// The rows dropped by validation are returned alongside the readings so
    /// a caller about to overwrite the source can tell it would lose data.
    pub async fn load_fresh(&self) -> Result<Decoded, LoadError> {
        let source = self.select_source().await?;
        self.read(&source).await
    }

    /// Forget every cached record set.
    pub async fn invalidate(&self) {
        self.cache.clear().await;
        debug!("Dataset cache cleared");
    }

    async fn select_source(&self) -> Result<Source<'_>, LoadError> {
        let local_exists = fs::try_exists(&self.local_path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.local_path.clone(),
                source,
            })?;

        if local_exists {
            return Ok(Source::Local(&self.local_path));
        }

        match &self.remote {
            Some(remote) => Ok(Source::Remote(remote)),
            None => Err(LoadError::NotFound {
                path: self.local_path.clone(),
            }),
        }
    }

    async fn read(&self, source: &Source<'_>) -> Result<Decoded, LoadError> {
        let bytes = match source {
            Source::Local(path) => fs::read(path).await.map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LoadError::NotFound {
                    path: path.to_path_buf(),
                },
                _ => LoadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                },
            })?,
            Source::Remote(remote) => remote.fetch().await?,
        };

        let id = source.id();
        let decoded = csv_format::decode(&bytes).map_err(|e| LoadError::Parse {
            source_id: id.clone(),
            reason: e.to_string(),
        })?;

        if !decoded.row_errors.is_empty() {
            warn!(
                source = %id,
                dropped = decoded.row_errors.len(),
                "Dataset rows dropped during load"
            );
        }
        info!(source = %id, records = decoded.readings.len(), "Dataset loaded");

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::tests::{spawn_remote, REMOTE_CSV};

    const LOCAL_CSV: &str = "\
Timestamp,Temperature,AC_Status,Fan_Status
2025-02-01 10:00:00,19.5,0,0
2025-02-01 09:00:00,18.0,1,1
2025-02-01 11:00:00,oops,1,1
";

    #[tokio::test]
    async fn local_file_takes_precedence_over_remote() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, LOCAL_CSV).await.unwrap();

        let base = spawn_remote().await;
        let loader = DatasetLoader::new(&path, Some(RemoteSource::new(format!("{base}/data.csv"))));

        let readings = loader.load().await.unwrap();
        // Bad row dropped, source order kept.
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].temperature, 19.5);
        assert_eq!(readings[1].temperature, 18.0);
    }

    #[tokio::test]
    async fn falls_back_to_remote_when_local_missing() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_remote().await;
        let loader = DatasetLoader::new(
            dir.path().join("absent.csv"),
            Some(RemoteSource::new(format!("{base}/data.csv"))),
        );

        let readings = loader.load().await.unwrap();
        let expected = csv_format::decode(REMOTE_CSV.as_bytes()).unwrap().readings;
        assert_eq!(*readings, expected);
    }

    #[tokio::test]
    async fn missing_local_without_remote_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DatasetLoader::new(dir.path().join("absent.csv"), None);

        assert!(matches!(
            loader.load().await,
            Err(LoadError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn remote_failure_is_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_remote().await;
        let loader = DatasetLoader::new(
            dir.path().join("absent.csv"),
            Some(RemoteSource::new(format!("{base}/missing.csv"))),
        );

        assert!(matches!(
            loader.load().await,
            Err(LoadError::Network { .. })
        ));
    }

    #[tokio::test]
    async fn missing_column_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "Timestamp,Temperature\n2025-01-01 00:00:00,20\n")
            .await
            .unwrap();

        let loader = DatasetLoader::new(&path, None);
        match loader.load().await {
            Err(LoadError::Parse { reason, .. }) => {
                assert!(reason.contains("AC_Status"));
                assert!(reason.contains("Fan_Status"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cache_is_used_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, LOCAL_CSV).await.unwrap();
        let loader = DatasetLoader::new(&path, None);

        assert_eq!(loader.load().await.unwrap().len(), 2);

        fs::write(
            &path,
            "Timestamp,Temperature,AC_Status,Fan_Status\n2025-03-01 00:00:00,1,0,0\n",
        )
        .await
        .unwrap();

        // Still the cached set.
        assert_eq!(loader.load().await.unwrap().len(), 2);
        // load_fresh always reads the file.
        assert_eq!(loader.load_fresh().await.unwrap().readings.len(), 1);

        loader.invalidate().await;
        assert_eq!(loader.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn load_fresh_reports_dropped_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, LOCAL_CSV).await.unwrap();

        let decoded = DatasetLoader::new(&path, None).load_fresh().await.unwrap();
        assert_eq!(decoded.readings.len(), 2);
        assert_eq!(decoded.row_errors.len(), 1);
        assert_eq!(decoded.row_errors[0].line, 4);
    }

    #[tokio::test]
    async fn load_then_merge_into_empty_keeps_every_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, LOCAL_CSV).await.unwrap();

        let loaded = DatasetLoader::new(&path, None).load().await.unwrap();
        let merged = crate::dataset::merge(&[], &loaded);

        let mut expected: Vec<_> = loaded.iter().map(|r| r.timestamp).collect();
        expected.sort();
        let got: Vec<_> = merged.iter().map(|r| r.timestamp).collect();
        assert_eq!(got, expected);
    }
}
