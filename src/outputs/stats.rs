//! Statistics file serialization.
//!
//! Written on every run, independent of the catalogue format choice and of
//! `--stats-only`.

use crate::stats::CatalogueStats;
use crate::utils::{run_timestamp, sanitize_timestamp};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the run statistics to a freshly timestamped JSON file and return
/// its path. The output directory is created if missing.
#[instrument(level = "info", skip_all, fields(%output_dir))]
pub async fn write_stats(
    stats: &CatalogueStats,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = PathBuf::from(output_dir).join(format!(
        "catalogue_stats_{}.json",
        sanitize_timestamp(&run_timestamp())
    ));

    let body = serde_json::to_string_pretty(stats)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create output directory");
        return Err(e.into());
    }

    fs::write(&path, body).await?;
    info!(path = %path.display(), total_stations = stats.total_stations, "Wrote statistics file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationRecord;

    #[tokio::test]
    async fn test_stats_file_written_and_decodable() {
        let dir = tempfile::tempdir().unwrap();
        let stations = vec![
            StationRecord {
                name: "A".to_string(),
                country: "France".to_string(),
                tags: "jazz".to_string(),
                bitrate: 128,
                ..Default::default()
            },
            StationRecord {
                name: "B".to_string(),
                country: "Germany".to_string(),
                ..Default::default()
            },
        ];
        let stats = CatalogueStats::collect(&stations);

        let path = write_stats(&stats, dir.path().to_str().unwrap()).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("catalogue_stats_"));
        assert!(name.ends_with(".json"));
        assert!(!name.contains(':'));

        let contents = std::fs::read_to_string(&path).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(decoded["total_stations"], 2);
        assert_eq!(decoded["countries"]["France"], 1);
        assert_eq!(decoded["bitrate_distribution"]["128-159"], 1);
        assert_eq!(decoded["top_countries"]["France"], 1);
    }
}
