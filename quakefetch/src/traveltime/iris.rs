//! IRIS travel time web service client.
//!
//! Queries `https://service.iris.edu/irisws/traveltime/1/`, which evaluates
//! TauP travel times for standard velocity models (iasp91, prem, ak135).
//!
//! # Response format
//!
//! With `noheader=true` the service returns one whitespace-separated line per
//! arrival:
//!
//! ```text
//! 10.00    10.0   P        145.61     13.57    26.58    26.54    10.00  = P
//! 10.00    10.0   S        261.78     25.02    27.42    27.36    10.00  = S
//! ```
//!
//! Columns: distance (deg), depth (km), phase name, travel time (s), then
//! ray parameter and angle columns we do not consume.

use tracing::debug;

use super::{Arrival, TravelTimeError, TravelTimeModel};
use crate::http::HttpClient;

/// Base URL of the IRIS travel time service.
const IRIS_TRAVELTIME_URL: &str = "https://service.iris.edu/irisws/traveltime/1";

/// Default velocity model requested from the service.
const DEFAULT_MODEL: &str = "iasp91";

/// Travel time model backed by the IRIS web service.
///
/// Generic over the HTTP client so tests can inject a mock.
pub struct IrisTravelTimeClient<C: HttpClient> {
    http_client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClient> IrisTravelTimeClient<C> {
    /// Creates a client for the iasp91 model.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            base_url: IRIS_TRAVELTIME_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different velocity model, e.g. `prem` or `ak135`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the service base URL (local mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_url(&self, depth_km: f64, distance_deg: f64, phases: &[String]) -> String {
        format!(
            "{}/query?model={}&evdepth={}&distdeg={}&phases={}&noheader=true",
            self.base_url,
            self.model,
            depth_km,
            distance_deg,
            phases.join(",")
        )
    }

    fn parse_response(text: &str) -> Result<Vec<Arrival>, TravelTimeError> {
        let mut arrivals = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(TravelTimeError::Parse(format!(
                    "expected at least 4 columns, got {:?}",
                    line
                )));
            }
            let phase = fields[2].to_string();
            let time_secs: f64 = fields[3]
                .parse()
                .map_err(|_| TravelTimeError::Parse(format!("bad travel time in {:?}", line)))?;
            arrivals.push(Arrival { phase, time_secs });
        }
        // The service emits time-sorted tables; sorting again keeps the
        // trait contract independent of server behavior.
        arrivals.sort_by(|a, b| a.time_secs.total_cmp(&b.time_secs));
        Ok(arrivals)
    }
}

impl<C: HttpClient> TravelTimeModel for IrisTravelTimeClient<C> {
    fn travel_times(
        &self,
        depth_km: f64,
        distance_deg: f64,
        phases: &[String],
    ) -> Result<Vec<Arrival>, TravelTimeError> {
        let url = self.build_url(depth_km, distance_deg, phases);
        debug!(%url, "querying travel times");

        let body = self.http_client.get(&url)?;
        let text = String::from_utf8_lossy(&body);
        let arrivals = Self::parse_response(&text)?;

        if arrivals.is_empty() {
            return Err(TravelTimeError::PhaseNotFound {
                depth_km,
                distance_deg,
                phases: phases.to_vec(),
            });
        }
        Ok(arrivals)
    }
}
