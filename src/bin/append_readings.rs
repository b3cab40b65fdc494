//! Merges new readings into the local dataset file.
//!
//! Usage:
//!   cargo run --bin append_readings -- --input new_readings.csv
//!   cargo run --bin append_readings -- --sample 2025-01-03
//!
//! Readings whose timestamp is already in the dataset are ignored.

use std::env;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hourly_temperature::{
    config::Config,
    dashboard::DashboardService,
    dataset::{csv_format, sample::sample_day, Reading},
    loader_from_config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let flag = |name: &str| {
        args.windows(2)
            .find(|w| w[0] == name)
            .map(|w| w[1].clone())
    };

    let input = flag("--input");
    let sample = flag("--sample");
    if input.is_none() && sample.is_none() {
        bail!("usage: append_readings [--input <csv>] [--sample <YYYY-MM-DD>]");
    }

    let mut incoming: Vec<Reading> = Vec::new();

    if let Some(path) = input {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {path}"))?;
        let decoded = csv_format::decode(&bytes).with_context(|| format!("invalid CSV in {path}"))?;
        info!(
            path = %path,
            readings = decoded.readings.len(),
            dropped = decoded.row_errors.len(),
            "Input file parsed"
        );
        incoming.extend(decoded.readings);
    }

    if let Some(day) = sample {
        let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
            .with_context(|| format!("--sample expects YYYY-MM-DD, got {day:?}"))?;
        incoming.extend(sample_day(day));
    }

    let config = Config::from_env()?;
    let service = DashboardService::new(loader_from_config(&config));
    let outcome = service
        .import(incoming)
        .await
        .with_context(|| format!("failed to update {}", config.dataset_path.display()))?;

    println!(
        "Database updated successfully! Total records: {} ({} added, {} ignored)",
        outcome.total_records, outcome.added, outcome.ignored
    );
    Ok(())
}
