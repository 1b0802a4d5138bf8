//! Event catalog ingestion.
//!
//! Reads CSV catalogs with the columns `time, longitude, latitude, depth,
//! magnitude` (depth in kilometers, magnitude optional). The magnitude is
//! carried for display only; planning never uses it.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use quakefetch::event::EventOrigin;

use crate::error::CliError;

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct CatalogEvent {
    /// Hypocenter parameters handed to the planner.
    pub origin: EventOrigin,
    /// Catalog magnitude, if given.
    pub magnitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    longitude: f64,
    latitude: f64,
    depth: f64,
    #[serde(default)]
    magnitude: Option<f64>,
}

/// Reads a catalog file, dispatching on the file extension.
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEvent>, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") => read_csv(path),
        _ => Err(CliError::Catalog(format!(
            "unrecognized catalog format: {}",
            path.display()
        ))),
    }
}

fn read_csv(path: &Path) -> Result<Vec<CatalogEvent>, CliError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut events = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        let time = parse_time(&row.time)?;
        events.push(CatalogEvent {
            origin: EventOrigin::new(time, row.latitude, row.longitude, row.depth),
            magnitude: row.magnitude,
        });
    }
    Ok(events)
}

/// Parses catalog timestamps: RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS`
/// (with optional fractional seconds) interpreted as UTC.
fn parse_time(text: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(CliError::Catalog(format!("unrecognized time: {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn write_catalog(contents: &str) -> tempfile::TempPath {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.into_temp_path()
    }

    #[test]
    fn test_read_csv_catalog() {
        let path = write_catalog(
            "time,longitude,latitude,depth,magnitude\n\
             2020-01-01T00:00:00,20.0,10.0,33.0,6.5\n\
             1995-11-14 06:32:55.75,95.9,-8.3,10.0,\n",
        );

        let events = read_catalog(&path).unwrap();
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(
            first.origin.time,
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(first.origin.latitude, 10.0);
        assert_eq!(first.origin.longitude, 20.0);
        assert_eq!(first.origin.depth_km, 33.0);
        assert_eq!(first.magnitude, Some(6.5));

        let second = &events[1];
        assert_eq!(second.magnitude, None);
        assert_eq!(second.origin.event_id(), "19951114063255");
    }

    #[test]
    fn test_rfc3339_time_with_zone_suffix() {
        let path = write_catalog(
            "time,longitude,latitude,depth,magnitude\n\
             2020-06-01T12:30:00Z,0.0,0.0,10.0,5.0\n",
        );
        let events = read_catalog(&path).unwrap();
        assert_eq!(
            events[0].origin.time,
            Utc.with_ymd_and_hms(2020, 6, 1, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_unrecognized_extension_is_error() {
        let result = read_catalog(Path::new("catalog.quakeml"));
        assert!(matches!(result, Err(CliError::Catalog(_))));
    }

    #[test]
    fn test_bad_time_is_error() {
        let path = write_catalog(
            "time,longitude,latitude,depth,magnitude\n\
             yesterday,0.0,0.0,10.0,5.0\n",
        );
        assert!(matches!(read_catalog(&path), Err(CliError::Catalog(_))));
    }
}
