//! Catalogue file serialization.
//!
//! Two formats are supported:
//! - `jsonl`: one compact JSON document per line, the friendlier shape for
//!   streaming ingestion into a vector store
//! - `json`: a single pretty-printed object with a generation-metadata
//!   envelope and the document array

use crate::cli::OutputFormat;
use crate::models::{Catalogue, CatalogueInfo, RagDocument};
use crate::utils::{run_timestamp, sanitize_timestamp};
use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Source label embedded in the JSON envelope.
const SOURCE_LABEL: &str = "RadioBrowser API";
/// Envelope format version.
const FORMAT_VERSION: &str = "1.0";

/// Write the document set to a freshly timestamped catalogue file.
///
/// Returns the path of the written file. The output directory is created if
/// missing.
#[instrument(level = "info", skip_all, fields(%output_dir, count = documents.len(), ?format))]
pub async fn write_catalogue(
    documents: &[RagDocument],
    output_dir: &str,
    format: OutputFormat,
) -> Result<PathBuf, Box<dyn Error>> {
    let timestamp = run_timestamp();
    let path = PathBuf::from(output_dir).join(format!(
        "radiobrowser_catalogue_{}.{}",
        sanitize_timestamp(&timestamp),
        format.extension()
    ));

    let body = match format {
        OutputFormat::Jsonl => {
            let mut lines = String::new();
            for document in documents {
                writeln!(lines, "{}", serde_json::to_string(document)?)?;
            }
            lines
        }
        OutputFormat::Json => {
            let catalogue = Catalogue {
                metadata: CatalogueInfo {
                    generated_at: timestamp,
                    total_stations: documents.len(),
                    source: SOURCE_LABEL.to_string(),
                    format_version: FORMAT_VERSION.to_string(),
                },
                stations: documents.to_vec(),
            };
            serde_json::to_string_pretty(&catalogue)?
        }
    };

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create output directory");
        return Err(e.into());
    }

    fs::write(&path, body).await?;
    info!(path = %path.display(), count = documents.len(), "Wrote catalogue file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationRecord;
    use crate::transform::station_to_document;

    fn sample_documents() -> Vec<RagDocument> {
        ["aaa-111", "bbb-222", "ccc-333"]
            .iter()
            .map(|id| {
                station_to_document(&StationRecord {
                    name: format!("Station {id}"),
                    country: "France".to_string(),
                    stationuuid: id.to_string(),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn test_jsonl_round_trip_preserves_ids() {
        let dir = tempfile::tempdir().unwrap();
        let documents = sample_documents();

        let path = write_catalogue(&documents, dir.path().to_str().unwrap(), OutputFormat::Jsonl)
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let decoded: Vec<RagDocument> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(decoded.len(), documents.len());
        for (original, roundtripped) in documents.iter().zip(&decoded) {
            assert_eq!(original.id, roundtripped.id);
            assert_eq!(original.metadata.uuid, roundtripped.metadata.uuid);
        }
    }

    #[tokio::test]
    async fn test_json_envelope_fields() {
        let dir = tempfile::tempdir().unwrap();
        let documents = sample_documents();

        let path = write_catalogue(&documents, dir.path().to_str().unwrap(), OutputFormat::Json)
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let catalogue: Catalogue = serde_json::from_str(&contents).unwrap();

        assert_eq!(catalogue.metadata.total_stations, 3);
        assert_eq!(catalogue.metadata.source, "RadioBrowser API");
        assert_eq!(catalogue.metadata.format_version, "1.0");
        assert!(!catalogue.metadata.generated_at.is_empty());
        assert_eq!(catalogue.stations.len(), 3);
    }

    #[tokio::test]
    async fn test_filename_shape() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_catalogue(&[], dir.path().to_str().unwrap(), OutputFormat::Jsonl)
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("radiobrowser_catalogue_"));
        assert!(name.ends_with(".jsonl"));
        assert!(!name.contains(':'));
    }

    #[tokio::test]
    async fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/out");

        let path = write_catalogue(&[], nested.to_str().unwrap(), OutputFormat::Jsonl)
            .await
            .unwrap();
        assert!(path.exists());
    }
}
