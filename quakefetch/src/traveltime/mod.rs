//! Seismic phase travel time lookup.
//!
//! The planner asks a [`TravelTimeModel`] how long a named phase takes to
//! travel from a source at some depth to a receiver at some epicentral
//! distance. One production implementation is provided, backed by the IRIS
//! travel time web service; tests inject scripted models instead.

mod iris;

pub use iris::IrisTravelTimeClient;

use crate::http::HttpError;
use thiserror::Error;

/// One phase arrival at a given depth and distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    /// Seismic phase name, e.g. `P`, `S`, `PKP`.
    pub phase: String,
    /// Travel time from the origin in seconds.
    pub time_secs: f64,
}

/// Errors from travel time lookups.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TravelTimeError {
    /// None of the requested phases arrives at this depth/distance, e.g. a
    /// direct P wave inside the core shadow zone.
    #[error(
        "no arrival for phases {phases:?} at {distance_deg} deg distance, {depth_km} km depth"
    )]
    PhaseNotFound {
        depth_km: f64,
        distance_deg: f64,
        phases: Vec<String>,
    },

    /// The travel time service could not be reached.
    #[error("travel time request failed: {0}")]
    Http(#[from] HttpError),

    /// The service answered with something that is not a travel time table.
    #[error("malformed travel time response: {0}")]
    Parse(String),
}

/// Travel time lookup for a set of seismic phases.
///
/// # Contract
///
/// Implementations must return arrivals sorted by ascending travel time, so
/// the first entry is the earliest matching arrival and the last entry the
/// latest. A lookup with no matching arrival fails with
/// [`TravelTimeError::PhaseNotFound`] rather than returning an empty list.
///
/// Lookups are pure functions of their inputs; implementations must be safe
/// for concurrent read-only use.
pub trait TravelTimeModel: Send + Sync {
    /// Returns the arrivals of `phases` for a source at `depth_km` observed
    /// at `distance_deg` epicentral distance.
    fn travel_times(
        &self,
        depth_km: f64,
        distance_deg: f64,
        phases: &[String],
    ) -> Result<Vec<Arrival>, TravelTimeError>;
}
