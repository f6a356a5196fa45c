//! RadioBrowser API access: mirror resolution and paginated station fetching
//! with exponential backoff retry logic.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`FetchPage`]: Core trait defining one HTTP page fetch
//! - [`HttpFetcher`]: Wraps a `reqwest` client
//! - [`RetryFetch`]: Decorator that adds retry logic to any `FetchPage` implementation
//!
//! Pagination ([`fetch_all_stations`]) is generic over [`FetchPage`], which is
//! what makes the termination rules testable without a live mirror.
//!
//! # Retry Strategy
//!
//! - Up to 3 attempts per page (configurable)
//! - Exponential backoff starting at 1 second, doubling each attempt
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::error::CatalogueError;
use crate::models::StationRecord;
use crate::utils::truncate_for_log;
use rand::{rng, Rng};
use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;

/// The public RadioBrowser mirrors, in probe order.
pub const DEFAULT_MIRRORS: [&str; 7] = [
    "https://de2.api.radio-browser.info",
    "https://fi1.api.radio-browser.info",
    "https://de1.api.radio-browser.info",
    "https://fr1.api.radio-browser.info",
    "https://nl1.api.radio-browser.info",
    "https://gb1.api.radio-browser.info",
    "https://us1.api.radio-browser.info",
];

/// Configuration for RadioBrowser access.
///
/// All knobs that were implicit in the upstream service contract live here so
/// callers construct the generator without hidden process-wide state.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Candidate base URLs, probed in order by [`resolve_mirror`].
    pub mirrors: Vec<String>,
    /// Timeout for the per-mirror liveness probe.
    pub probe_timeout: StdDuration,
    /// Timeout for each station page request.
    pub fetch_timeout: StdDuration,
    /// Total attempts per page before the failure is surfaced (minimum 1).
    pub max_attempts: usize,
    /// Initial backoff delay, doubled on each subsequent attempt.
    pub base_delay: StdDuration,
    /// Pause between successful page fetches, to go easy on the upstream.
    pub page_delay: StdDuration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            probe_timeout: StdDuration::from_secs(10),
            fetch_timeout: StdDuration::from_secs(30),
            max_attempts: 3,
            base_delay: StdDuration::from_secs(1),
            page_delay: StdDuration::from_millis(500),
        }
    }
}

/// Trait for fetching one HTTP page.
///
/// Implementors take a URL and return a response body. This abstraction
/// allows decorators (like retry logic) and scripted test doubles.
pub trait FetchPage {
    /// The type of response body returned.
    type Response;

    /// Fetch the given URL and return the response body.
    async fn fetch(&self, url: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// [`FetchPage`] implementation backed by a `reqwest` client.
///
/// Non-success HTTP statuses are turned into errors so the retry layer
/// treats them like any other transient failure.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests all carry the given timeout.
    pub fn new(timeout: StdDuration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let result = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok::<String, reqwest::Error>(response.text().await?)
        }
        .await;
        let dt = t0.elapsed();

        match result {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "HTTP request failed");
                Err(Box::new(e))
            }
        }
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchPage`]
/// implementation.
///
/// # Backoff Strategy
///
/// The delay between attempts follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    /// The underlying fetcher to wrap.
    inner: T,
    /// Total attempts before giving up (minimum 1).
    max_attempts: usize,
    /// Initial delay between attempts (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    /// Create a new retry wrapper around an existing [`FetchPage`]
    /// implementation.
    ///
    /// `max_attempts` counts the initial try, so 3 means at most two retries.
    pub fn new(inner: T, max_attempts: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchPage for RetryFetch<T>
where
    T: FetchPage + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn fetch(&self, url: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch(url).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt >= self.max_attempts {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc; the doubling factor saturates so large
                    // configured attempt counts cannot overflow
                    let exponent = (attempt - 1).min(32) as u32;
                    let mut delay = self.base_delay.saturating_mul(2u32.saturating_pow(exponent));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Probe each configured mirror in order and return the first that answers
/// the `/json/countries` liveness check with a success status.
///
/// No per-mirror retry: retries belong to the data fetches, not the probe.
///
/// # Errors
///
/// [`CatalogueError::MirrorUnavailable`] when every candidate errors, times
/// out, or returns a non-success status.
#[instrument(level = "info", skip_all)]
pub async fn resolve_mirror(config: &ApiConfig) -> Result<String, Box<dyn Error>> {
    let client = Client::builder().timeout(config.probe_timeout).build()?;

    for mirror in &config.mirrors {
        let probe = match Url::parse(mirror).and_then(|u| u.join("json/countries")) {
            Ok(u) => u,
            Err(e) => {
                warn!(%mirror, error = %e, "Skipping malformed mirror URL");
                continue;
            }
        };

        match client.get(probe).send().await {
            Ok(response) if response.status().is_success() => {
                info!(%mirror, "Using mirror");
                return Ok(mirror.clone());
            }
            Ok(response) => {
                warn!(%mirror, status = %response.status(), "Mirror probe returned non-success status");
            }
            Err(e) => {
                warn!(%mirror, error = %e, "Mirror probe failed");
            }
        }
    }

    Err(Box::new(CatalogueError::MirrorUnavailable))
}

/// Build one station-search page URL.
///
/// Server-side filters: `hidebroken` drops streams the directory knows are
/// dead, `has_geo_info` requires geographic metadata.
fn search_url(base_url: &str, limit: usize, offset: usize) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?.join("json/stations/search")?;
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string())
        .append_pair("offset", &offset.to_string())
        .append_pair("hidebroken", "true")
        .append_pair("has_geo_info", "true");
    Ok(url)
}

/// Fetch every station page from the search endpoint, in offset order.
///
/// Termination rules:
/// - an empty page or a page shorter than `batch_size` ends pagination
/// - retry exhaustion on a page is logged and ends pagination, keeping the
///   pages collected so far
/// - a JSON decode failure is logged and treated as end of data, not as a
///   fatal error for already-collected pages
///
/// A small delay is inserted between successful page fetches.
#[instrument(level = "info", skip_all, fields(%base_url, batch_size))]
pub async fn fetch_all_stations<F>(
    fetcher: &F,
    base_url: &str,
    batch_size: usize,
    page_delay: StdDuration,
) -> Result<Vec<StationRecord>, Box<dyn Error>>
where
    F: FetchPage<Response = String>,
{
    let mut all_stations: Vec<StationRecord> = Vec::new();
    let mut offset = 0usize;

    loop {
        let url = search_url(base_url, batch_size, offset)?;
        info!(offset, limit = batch_size, "Fetching station page");

        let body = match fetcher.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    offset,
                    collected = all_stations.len(),
                    error = %e,
                    "Page fetch failed after retries; stopping pagination and keeping collected pages"
                );
                break;
            }
        };

        let stations: Vec<StationRecord> = match serde_json::from_str(&body) {
            Ok(stations) => stations,
            Err(e) => {
                // Upstream sometimes returns an undecodable body at the end of
                // the data set; treat it as end of stream either way.
                warn!(
                    offset,
                    collected = all_stations.len(),
                    error = %e,
                    body_preview = %truncate_for_log(&body, 300),
                    "Failed to decode station page; treating as end of data"
                );
                break;
            }
        };

        if stations.is_empty() {
            break;
        }

        let page_len = stations.len();
        all_stations.extend(stations);
        info!(fetched = page_len, total = all_stations.len(), "Fetched station page");

        // A short page signals the end of the data set.
        if page_len < batch_size {
            break;
        }

        offset += batch_size;
        sleep(page_delay).await;
    }

    info!(total = all_stations.len(), "Finished fetching stations");
    Ok(all_stations)
}

/// High-level entry point: fetch every station from a resolved mirror with
/// per-page retry, per the configured policy.
#[instrument(level = "info", skip_all, fields(%base_url, batch_size))]
pub async fn fetch_stations(
    config: &ApiConfig,
    base_url: &str,
    batch_size: usize,
) -> Result<Vec<StationRecord>, Box<dyn Error>> {
    let client = HttpFetcher::new(config.fetch_timeout)?;
    let api = RetryFetch::new(client, config.max_attempts, config.base_delay);
    fetch_all_stations(&api, base_url, batch_size, config.page_delay).await
}
