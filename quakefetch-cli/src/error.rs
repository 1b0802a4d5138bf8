//! CLI error types.

use quakefetch::downloader::DownloadError;
use quakefetch::http::HttpError;
use quakefetch::plan::PlanError;
use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog file could not be understood.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// The catalog file could not be read as CSV.
    #[error("catalog error: {0}")]
    Csv(#[from] csv::Error),

    /// Request planning failed.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Waveform retrieval failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The HTTP client could not be created or a request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Plan output could not be encoded as JSON.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
