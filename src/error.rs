//! Fatal error taxonomy for the catalogue generator.
//!
//! Only errors that abort the whole run live here. Per-page failures (retry
//! exhaustion, undecodable JSON) are logged and degrade to "stop paginating,
//! keep what we have" inside [`crate::api`].

use thiserror::Error;

/// Errors that abort a catalogue generation run.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Every configured RadioBrowser mirror failed the liveness probe.
    #[error("no RadioBrowser mirror responded to the liveness probe")]
    MirrorUnavailable,

    /// Pagination completed but zero stations were collected.
    #[error("no stations were fetched from the directory")]
    EmptyCatalogue,
}
