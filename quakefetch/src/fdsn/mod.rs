//! FDSN web service plumbing.
//!
//! The IRIS federator answers availability queries in "request" format:
//! per-datacenter blocks of service URLs followed by one request line per
//! channel epoch. This module parses those blocks, filters them by provider,
//! and merges station coordinates (from the FDSN station text service) into
//! the request lines so domains can post-filter them geographically.

mod record;
mod routing;
mod station;

pub use record::ChannelRecord;
pub use routing::{filter_providers, split_routing_response, DatacenterBlock};
pub use station::{merge_coordinates, station_coordinates};

use thiserror::Error;

use crate::http::HttpError;

/// Errors from FDSN response handling.
#[derive(Debug, Error)]
pub enum FdsnError {
    /// A request line did not have the six `NET STA LOC CHA START END`
    /// fields.
    #[error("malformed request line: {0:?}")]
    MalformedRecord(String),

    /// A station text service line could not be parsed.
    #[error("malformed station metadata line: {0:?}")]
    MalformedStation(String),

    /// Provider filtering removed every datacenter.
    #[error("nothing remains to download after the provider inclusion/exclusion filters have been applied")]
    NoDataRemaining,

    /// An FDSN service could not be reached.
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Appends `query` to a service base URL as advertised by the federator,
/// which may or may not carry a trailing slash.
pub fn service_query_url(base: &str) -> String {
    if base.ends_with('/') {
        format!("{}query", base)
    } else {
        format!("{}/query", base)
    }
}
