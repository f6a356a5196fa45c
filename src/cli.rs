//! Command-line interface definitions for the catalogue generator.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::{Parser, ValueEnum};

/// Output format for the generated catalogue file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A single JSON object with a metadata envelope and a station array.
    Json,
    /// Line-delimited JSON, one document per line.
    Jsonl,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Command-line arguments for the catalogue generator.
///
/// # Examples
///
/// ```sh
/// # Default run: fetch everything, write a jsonl catalogue plus stats under ./data
/// radio_catalogue
///
/// # Single-object JSON output into a custom directory
/// radio_catalogue --output-dir ./out --format json
///
/// # Statistics only, no catalogue file
/// radio_catalogue --stats-only
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for catalogue and statistics files
    #[arg(long, default_value = "data")]
    pub output_dir: String,

    /// Catalogue output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    pub format: OutputFormat,

    /// Page size for station-search API requests
    #[arg(long, default_value_t = 10_000)]
    pub batch_size: usize,

    /// Only generate the statistics file, skip the catalogue
    #[arg(long)]
    pub stats_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(&["radio_catalogue"]);

        assert_eq!(cli.output_dir, "data");
        assert_eq!(cli.format, OutputFormat::Jsonl);
        assert_eq!(cli.batch_size, 10_000);
        assert!(!cli.stats_only);
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::parse_from(&[
            "radio_catalogue",
            "--output-dir",
            "/tmp/catalogue",
            "--format",
            "json",
            "--batch-size",
            "500",
            "--stats-only",
        ]);

        assert_eq!(cli.output_dir, "/tmp/catalogue");
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.batch_size, 500);
        assert!(cli.stats_only);
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(&["radio_catalogue", "--format", "yaml"]);
        assert!(result.is_err());
    }
}
