use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_DATASET_PATH: &str = "Hourly_Temperature_Readings_Dataset.csv";
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/habdulhaq87/temperature/main/Hourly_Temperature_Readings_Dataset.csv";

#[derive(Debug, Clone)]
pub struct Config {
    /// Local persisted copy of the dataset; read first, written on every merge.
    pub dataset_path: PathBuf,
    /// Remote CSV used when the local copy does not exist. `None` disables it.
    pub dataset_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            dataset_path: optional("DATASET_PATH", DEFAULT_DATASET_PATH).into(),
            dataset_url: parse_url(&optional("DATASET_URL", DEFAULT_DATASET_URL))?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

/// An empty value disables the remote source; anything else must be http(s).
fn parse_url(raw: &str) -> Result<Option<String>> {
    let url = raw.trim();
    if url.is_empty() {
        return Ok(None);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("DATASET_URL must be an http(s) URL, got: {url:?}");
    }
    Ok(Some(url.to_owned()))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
