//! Catalogue statistics: per-category frequency tables over the raw records.
//!
//! Statistics are collected in a single pass over all fetched
//! [`StationRecord`]s, before any document filtering, so the per-category
//! sums line up with the raw station count.
//!
//! [`FrequencyTable`] keeps its entries in first-seen order. That makes the
//! top-N tie-break explicit: a stable descending sort leaves equal counts in
//! the order their keys first appeared in the input.

use crate::models::StationRecord;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// Label used when a string field is missing or empty.
const UNKNOWN: &str = "Unknown";

/// Width of one bitrate histogram bucket, in kbps.
const BITRATE_BUCKET_WIDTH: u32 = 32;

/// How many entries the country and language leaderboards keep.
const TOP_COUNTRIES: usize = 20;
const TOP_LANGUAGES: usize = 20;
/// How many entries the tag leaderboard keeps.
const TOP_TAGS: usize = 50;

/// A frequency table that remembers the order keys were first seen.
///
/// Serializes as a JSON object with keys in insertion order.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Increment the count for `key`, inserting it at the end on first sight.
    pub fn bump(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    /// Count recorded for `key`, 0 if never seen.
    pub fn count(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// The `n` highest-count entries, descending.
    ///
    /// The sort is stable over first-seen order, so when counts tie the key
    /// that appeared first in the input wins.
    pub fn top(&self, n: usize) -> FrequencyTable {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);

        let index = sorted
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.clone(), i))
            .collect();
        FrequencyTable {
            entries: sorted,
            index,
        }
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Aggregate statistics over one catalogue run.
#[derive(Debug, Serialize)]
pub struct CatalogueStats {
    /// Total number of raw records seen (before document filtering).
    pub total_stations: u64,
    pub countries: FrequencyTable,
    pub languages: FrequencyTable,
    pub tags: FrequencyTable,
    pub bitrate_distribution: FrequencyTable,
    pub codec_distribution: FrequencyTable,
    pub top_countries: FrequencyTable,
    pub top_languages: FrequencyTable,
    pub top_tags: FrequencyTable,
}

/// Histogram bucket label for a non-zero bitrate, e.g. `128` -> `"128-159"`.
fn bitrate_bucket(bitrate: u32) -> String {
    let floor = (bitrate / BITRATE_BUCKET_WIDTH) * BITRATE_BUCKET_WIDTH;
    format!("{}-{}", floor, floor + BITRATE_BUCKET_WIDTH - 1)
}

/// A string field's stats label: trimmed value, or `"Unknown"` when empty.
fn label_or_unknown(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { UNKNOWN } else { trimmed }
}

impl CatalogueStats {
    /// Single pass over all raw records.
    ///
    /// Every record contributes exactly one count to the country, language,
    /// and codec tables. Tags contribute one count per trimmed, lowercased
    /// token. Zero bitrates are excluded from the bitrate distribution.
    #[instrument(level = "info", skip_all, fields(total = stations.len()))]
    pub fn collect(stations: &[StationRecord]) -> Self {
        let mut countries = FrequencyTable::default();
        let mut languages = FrequencyTable::default();
        let mut tags = FrequencyTable::default();
        let mut bitrate_distribution = FrequencyTable::default();
        let mut codec_distribution = FrequencyTable::default();

        for station in stations {
            countries.bump(label_or_unknown(&station.country));
            languages.bump(label_or_unknown(&station.language));
            codec_distribution.bump(label_or_unknown(&station.codec));

            for tag in station.tags.split(',') {
                let tag = tag.trim().to_lowercase();
                if !tag.is_empty() {
                    tags.bump(&tag);
                }
            }

            if station.bitrate > 0 {
                bitrate_distribution.bump(&bitrate_bucket(station.bitrate));
            }
        }

        let top_countries = countries.top(TOP_COUNTRIES);
        let top_languages = languages.top(TOP_LANGUAGES);
        let top_tags = tags.top(TOP_TAGS);

        info!(
            total_stations = stations.len(),
            countries = countries.len(),
            languages = languages.len(),
            tags = tags.len(),
            "Collected catalogue statistics"
        );

        Self {
            total_stations: stations.len() as u64,
            countries,
            languages,
            tags,
            bitrate_distribution,
            codec_distribution,
            top_countries,
            top_languages,
            top_tags,
        }
    }
}
