use std::sync::Arc;

use reqwest::Client;
use tracing::debug;

use crate::error::LoadError;

/// HTTP client for the remote copy of the dataset.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    url: String,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                url: url.into(),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// GET the CSV body. Any transport failure or non-2xx status is a
    /// `LoadError::Network`; nothing is retried.
    pub async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let url = self.url();
        debug!(url = %url, "Fetching remote dataset");

        let network = |source| LoadError::Network {
            url: url.to_owned(),
            source,
        };

        let bytes = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .bytes()
            .await
            .map_err(network)?;

        debug!(url = %url, bytes = bytes.len(), "Remote dataset received");
        Ok(bytes.to_vec())
    }
}
