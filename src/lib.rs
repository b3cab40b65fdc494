pub mod api;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod reading_cache;
pub mod remote;

use dataset::DatasetLoader;
use remote::RemoteSource;

/// Build the loader described by `config`.
pub fn loader_from_config(config: &config::Config) -> DatasetLoader {
    DatasetLoader::new(
        config.dataset_path.clone(),
        config.dataset_url.clone().map(RemoteSource::new),
    )
}
