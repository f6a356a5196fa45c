//! # Radio Catalogue
//!
//! A catalogue-generation pipeline that fetches the full RadioBrowser radio
//! station directory and reshapes it into retrieval-ready documents for
//! vector-database / LLM RAG indexing.
//!
//! ## Features
//!
//! - Resolves a reachable API mirror from the public RadioBrowser pool
//! - Paginates the station-search endpoint sequentially until exhausted,
//!   with bounded retry and backoff per page
//! - Formats each station into a rich text description plus metadata
//! - Aggregates frequency statistics (countries, languages, tags, bitrates,
//!   codecs) over the raw records
//! - Writes timestamped `jsonl`/`json` catalogue and statistics files
//!
//! ## Usage
//!
//! ```sh
//! radio_catalogue --output-dir data --format jsonl
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Mirror resolution**: Probe candidate base URLs in order
//! 2. **Fetching**: Sequential offset pagination of the station search
//! 3. **Aggregation**: One statistics pass over all raw records
//! 4. **Output**: Write the statistics file, then (unless `--stats-only`)
//!    the formatted catalogue

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod error;
mod models;
mod outputs;
mod stats;
mod transform;
mod utils;

use api::ApiConfig;
use cli::{Cli, OutputFormat};
use error::CatalogueError;
use models::StationRecord;
use stats::CatalogueStats;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("catalogue generation starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(
        ?args.output_dir,
        ?args.format,
        args.batch_size,
        args.stats_only,
        "Parsed CLI arguments"
    );

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = ApiConfig::default();

    // ---- Resolve a mirror and fetch every station ----
    let base_url = api::resolve_mirror(&config).await?;
    let stations = api::fetch_stations(&config, &base_url, args.batch_size).await?;

    if stations.is_empty() {
        error!("No stations fetched from the directory");
        return Err(Box::new(CatalogueError::EmptyCatalogue));
    }

    write_outputs(&stations, &args.output_dir, args.format, args.stats_only).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Post-fetch pipeline: collect statistics over the raw records, write the
/// statistics file, then (unless `stats_only`) the formatted catalogue.
///
/// The statistics file is written on every run regardless of the catalogue
/// format choice.
async fn write_outputs(
    stations: &[StationRecord],
    output_dir: &str,
    format: OutputFormat,
    stats_only: bool,
) -> Result<(), Box<dyn Error>> {
    let stats = CatalogueStats::collect(stations);
    let stats_path = outputs::stats::write_stats(&stats, output_dir).await?;

    info!(
        total_stations = stats.total_stations,
        countries = stats.countries.len(),
        languages = stats.languages.len(),
        tags = stats.tags.len(),
        stats_file = %stats_path.display(),
        "Catalogue summary"
    );

    if stats_only {
        info!("Statistics generation complete, skipping catalogue file");
        return Ok(());
    }

    let documents = transform::build_documents(stations);
    let catalogue_path = outputs::catalogue::write_catalogue(&documents, output_dir, format).await?;
    info!(
        path = %catalogue_path.display(),
        documents = documents.len(),
        "Catalogue generation complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stations(count: usize) -> Vec<StationRecord> {
        (0..count)
            .map(|i| StationRecord {
                name: format!("Station {i}"),
                country: "Testland".to_string(),
                stationuuid: format!("uuid-{i}"),
                ..Default::default()
            })
            .collect()
    }

    fn file_names(dir: &std::path::Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_stats_only_skips_catalogue_file() {
        let dir = tempfile::tempdir().unwrap();

        write_outputs(
            &sample_stations(3),
            dir.path().to_str().unwrap(),
            OutputFormat::Jsonl,
            true,
        )
        .await
        .unwrap();

        let names = file_names(dir.path());
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("catalogue_stats_"));
        assert!(names.iter().all(|n| !n.starts_with("radiobrowser_catalogue_")));

        let contents = std::fs::read_to_string(dir.path().join(&names[0])).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(decoded["total_stations"], 3);
    }

    #[tokio::test]
    async fn test_full_run_writes_stats_and_catalogue() {
        let dir = tempfile::tempdir().unwrap();

        write_outputs(
            &sample_stations(2),
            dir.path().to_str().unwrap(),
            OutputFormat::Jsonl,
            false,
        )
        .await
        .unwrap();

        let names = file_names(dir.path());
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n.starts_with("catalogue_stats_")));
        assert!(
            names
                .iter()
                .any(|n| n.starts_with("radiobrowser_catalogue_") && n.ends_with(".jsonl"))
        );
    }
}
