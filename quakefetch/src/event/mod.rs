//! Seismic event types.
//!
//! An [`EventOrigin`] carries the hypocenter parameters that request planning
//! needs: origin time, epicenter coordinates, and source depth. Catalog
//! ingestion lives in the CLI crate; the library only consumes origins.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Hypocenter of a seismic event.
///
/// Immutable input to the planner; never mutated by the library. Depth is in
/// kilometers, the unit travel time models expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventOrigin {
    /// Origin time.
    pub time: DateTime<Utc>,
    /// Epicenter latitude in degrees.
    pub latitude: f64,
    /// Epicenter longitude in degrees.
    pub longitude: f64,
    /// Source depth in kilometers (non-negative).
    pub depth_km: f64,
}

impl EventOrigin {
    /// Creates a new event origin.
    pub fn new(time: DateTime<Utc>, latitude: f64, longitude: f64, depth_km: f64) -> Self {
        Self {
            time,
            latitude,
            longitude,
            depth_km,
        }
    }

    /// Event identifier derived from the origin time.
    ///
    /// Used by the storage naming scheme to group one event's files, e.g.
    /// `19951114063255` for 1995-11-14T06:32:55Z.
    pub fn event_id(&self) -> String {
        self.time.format("%Y%m%d%H%M%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_id_from_origin_time() {
        let origin = EventOrigin::new(
            Utc.with_ymd_and_hms(1995, 11, 14, 6, 32, 55).unwrap(),
            10.0,
            20.0,
            33.0,
        );
        assert_eq!(origin.event_id(), "19951114063255");
    }

    #[test]
    fn test_event_id_zero_pads_fields() {
        let origin = EventOrigin::new(
            Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap(),
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(origin.event_id(), "20200102030405");
    }
}
