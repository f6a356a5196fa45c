//! Station-to-document transformation.
//!
//! [`station_to_document`] is a pure function from one [`StationRecord`] to
//! one [`RagDocument`]. The description is assembled from a fixed sequence of
//! optional clauses; any clause whose source field is empty after trimming is
//! omitted entirely, so the text never contains placeholder filler.

use crate::models::{DocumentMetadata, RagDocument, StationRecord};
use crate::utils::group_digits;
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// How many comma-separated tags make it into the genre clause.
const MAX_GENRE_TAGS: usize = 5;

/// Three-tier audio quality label for a non-zero bitrate.
fn quality_label(bitrate: u32) -> &'static str {
    if bitrate >= 128 {
        "high quality"
    } else if bitrate >= 64 {
        "standard quality"
    } else {
        "low quality"
    }
}

/// Three-tier popularity label for a non-zero click count.
fn popularity_label(clickcount: u64) -> &'static str {
    if clickcount > 10_000 {
        "very popular"
    } else if clickcount > 1_000 {
        "popular"
    } else {
        "moderately popular"
    }
}

/// Format one station as a RAG document.
///
/// Clause order is fixed: name, location, language, genres, audio,
/// popularity, website. Clauses are joined with `". "` and a trailing period
/// is appended if missing, so a non-empty `content` always ends with exactly
/// one period.
pub fn station_to_document(station: &StationRecord) -> RagDocument {
    let name = station.name.trim();
    let country = station.country.trim();
    let state = station.state.trim();
    let language = station.language.trim();
    let tags = station.tags.trim();
    let homepage = station.homepage.trim();
    let codec = station.codec.trim();

    let mut parts: Vec<String> = Vec::new();

    if !name.is_empty() {
        parts.push(format!("Radio station: {name}"));
    }

    if !country.is_empty() {
        let location = if state.is_empty() {
            country.to_string()
        } else {
            format!("{state}, {country}")
        };
        parts.push(format!("Location: {location}"));
    }

    if !language.is_empty() {
        parts.push(format!("Language: {language}"));
    }

    if !tags.is_empty() {
        let genres = tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .take(MAX_GENRE_TAGS)
            .join(", ");
        if !genres.is_empty() {
            parts.push(format!("Genres: {genres}"));
        }
    }

    if station.bitrate > 0 {
        parts.push(format!(
            "Audio: {}kbps {} ({})",
            station.bitrate,
            codec,
            quality_label(station.bitrate)
        ));
    }

    if station.clickcount > 0 {
        parts.push(format!(
            "Popularity: {} listeners ({})",
            group_digits(station.clickcount),
            popularity_label(station.clickcount)
        ));
    }

    if !homepage.is_empty() {
        parts.push(format!("Website: {homepage}"));
    }

    let mut content = parts.join(". ");
    if !content.is_empty() && !content.ends_with('.') {
        content.push('.');
    }

    RagDocument {
        id: station.identifier().to_string(),
        content,
        metadata: DocumentMetadata {
            uuid: station.identifier().to_string(),
            name: name.to_string(),
            country: country.to_string(),
            language: language.to_string(),
            tags: tags.to_string(),
            state: state.to_string(),
            bitrate: station.bitrate,
            codec: codec.to_string(),
            clickcount: station.clickcount,
            votes: station.votes,
            homepage: homepage.to_string(),
            stream_url: station.stream_url().to_string(),
            favicon: station.favicon.clone(),
        },
    }
}

/// Transform a batch of raw records, dropping documents whose description
/// came out empty.
#[instrument(level = "info", skip_all, fields(total = stations.len()))]
pub fn build_documents(stations: &[StationRecord]) -> Vec<RagDocument> {
    let mut documents = Vec::with_capacity(stations.len());

    for (i, station) in stations.iter().enumerate() {
        if i % 1000 == 0 {
            debug!(processed = i, total = stations.len(), "Formatting stations");
        }
        let document = station_to_document(station);
        if !document.content.is_empty() {
            documents.push(document);
        }
    }

    info!(
        formatted = documents.len(),
        skipped = stations.len() - documents.len(),
        "Formatted stations for RAG"
    );
    documents
}
