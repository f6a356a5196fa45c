//! Data models for radio stations and their RAG representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`StationRecord`]: Raw station data as returned by the RadioBrowser API
//! - [`RagDocument`]: A station reshaped into retrieval-ready text plus metadata
//! - [`DocumentMetadata`]: The fixed-key metadata block attached to each document
//! - [`Catalogue`] / [`CatalogueInfo`]: Envelope for the single-object JSON output
//!
//! Deserialization of [`StationRecord`] is deliberately tolerant: every field
//! defaults when absent and unknown upstream fields are ignored, so any
//! superset of the documented station object parses cleanly.

use serde::{Deserialize, Serialize};

/// A raw radio station entry as returned by the RadioBrowser station-search
/// endpoint.
///
/// All fields default when missing so that the generator tolerates partial
/// records; field-presence decisions (which clauses to emit, which stats
/// buckets to count) are made downstream in [`crate::transform`] and
/// [`crate::stats`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StationRecord {
    /// Display name of the station.
    #[serde(default)]
    pub name: String,
    /// Country the station broadcasts from.
    #[serde(default)]
    pub country: String,
    /// State or region within the country, often empty.
    #[serde(default)]
    pub state: String,
    /// Broadcast language.
    #[serde(default)]
    pub language: String,
    /// Comma-separated genre tags, e.g. `"jazz, chill, lounge"`.
    #[serde(default)]
    pub tags: String,
    /// Station homepage URL.
    #[serde(default)]
    pub homepage: String,
    /// Raw stream URL as submitted to the directory.
    #[serde(default)]
    pub url: String,
    /// Stream URL after the directory resolved playlists/redirects.
    #[serde(default)]
    pub url_resolved: String,
    /// Favicon URL.
    #[serde(default)]
    pub favicon: String,
    /// Stream bitrate in kbps, 0 when unknown.
    #[serde(default)]
    pub bitrate: u32,
    /// Audio codec, e.g. `"MP3"` or `"AAC"`.
    #[serde(default)]
    pub codec: String,
    /// Number of clicks (listens) recorded by the directory.
    #[serde(default)]
    pub clickcount: u64,
    /// Number of votes recorded by the directory.
    #[serde(default)]
    pub votes: u64,
    /// Primary unique identifier.
    #[serde(default)]
    pub stationuuid: String,
    /// Legacy identifier field, used as a fallback.
    #[serde(default)]
    pub uuid: String,
}

impl StationRecord {
    /// The station's unique identifier: `stationuuid` when present,
    /// falling back to the legacy `uuid` field, else empty.
    pub fn identifier(&self) -> &str {
        if !self.stationuuid.is_empty() {
            &self.stationuuid
        } else {
            &self.uuid
        }
    }

    /// The playable stream URL, preferring the directory-resolved one.
    pub fn stream_url(&self) -> &str {
        if !self.url_resolved.is_empty() {
            &self.url_resolved
        } else {
            &self.url
        }
    }
}

/// A station formatted for retrieval-augmented generation: a searchable text
/// description plus a metadata block for filtering.
///
/// Immutable once created. Documents with an empty `content` are never
/// emitted; `id` is not guaranteed unique if upstream identifiers collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagDocument {
    /// The station's unique identifier (may be empty if upstream had none).
    pub id: String,
    /// Sentence-joined human-readable description of the station.
    pub content: String,
    /// Fixed-key metadata mirroring selected [`StationRecord`] fields.
    pub metadata: DocumentMetadata,
}

/// Metadata attached to each [`RagDocument`] for downstream filtering.
///
/// Keys are fixed regardless of which source fields were empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub uuid: String,
    pub name: String,
    pub country: String,
    pub language: String,
    pub tags: String,
    pub state: String,
    pub bitrate: u32,
    pub codec: String,
    pub clickcount: u64,
    pub votes: u64,
    pub homepage: String,
    pub stream_url: String,
    pub favicon: String,
}

/// Envelope for the single-object JSON output format.
#[derive(Debug, Serialize, Deserialize)]
pub struct Catalogue {
    /// Generation metadata.
    pub metadata: CatalogueInfo,
    /// The formatted documents, in fetch order.
    pub stations: Vec<RagDocument>,
}

/// Generation metadata for a [`Catalogue`].
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogueInfo {
    /// ISO-8601 local timestamp of the generation run.
    pub generated_at: String,
    /// Number of documents in the catalogue (after empty-content filtering).
    pub total_stations: usize,
    /// Source label, always `"RadioBrowser API"`.
    pub source: String,
    /// Catalogue format version, currently `"1.0"`.
    pub format_version: String,
}
