//! Output file generation for the catalogue and its statistics.
//!
//! # Submodules
//!
//! - [`catalogue`]: Writes the document set as line-delimited JSON or as a
//!   single enveloped JSON object
//! - [`stats`]: Writes the run's aggregate statistics
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── radiobrowser_catalogue_2026-08-30T14-03-22.123456.jsonl
//! └── catalogue_stats_2026-08-30T14-03-22.654321.json
//! ```
//!
//! File names embed an ISO-8601 timestamp with colons replaced by hyphens so
//! they stay valid on all filesystems. Each run writes fresh files; prior
//! output is never merged or overwritten.

pub mod catalogue;
pub mod stats;
