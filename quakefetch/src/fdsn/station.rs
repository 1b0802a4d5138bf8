//! Station coordinate lookup and merging.
//!
//! The request format carries no coordinates, but the geographic post-filter
//! needs them. The FDSN station text service answers bulk POST requests with
//! pipe-separated station rows; the coordinates are merged back into the
//! request records by `NET.STA` key.

use std::collections::HashMap;

use tracing::debug;

use super::{service_query_url, ChannelRecord, FdsnError};
use crate::http::HttpClient;

/// Fetches station coordinates for `records` from a station service.
///
/// Issues one bulk POST (`level=station&format=text`) covering all records
/// and returns a map from `NET.STA` to `(latitude, longitude)`.
pub fn station_coordinates<C: HttpClient>(
    http_client: &C,
    station_url: &str,
    records: &[ChannelRecord],
) -> Result<HashMap<String, (f64, f64)>, FdsnError> {
    let mut body = String::from("level=station\nformat=text\n");
    for record in records {
        body.push_str(&record.to_string());
        body.push('\n');
    }

    let url = service_query_url(station_url);
    debug!(%url, records = records.len(), "fetching station coordinates");
    let response = http_client.post(&url, &body)?;
    parse_station_text(&String::from_utf8_lossy(&response))
}

/// Parses the station text service format:
/// `Network|Station|Latitude|Longitude|Elevation|SiteName|StartTime|EndTime`.
fn parse_station_text(text: &str) -> Result<HashMap<String, (f64, f64)>, FdsnError> {
    let mut coordinates = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 4 {
            return Err(FdsnError::MalformedStation(line.to_string()));
        }
        let latitude: f64 = fields[2]
            .trim()
            .parse()
            .map_err(|_| FdsnError::MalformedStation(line.to_string()))?;
        let longitude: f64 = fields[3]
            .trim()
            .parse()
            .map_err(|_| FdsnError::MalformedStation(line.to_string()))?;
        coordinates.insert(
            format!("{}.{}", fields[0].trim(), fields[1].trim()),
            (latitude, longitude),
        );
    }
    Ok(coordinates)
}

/// Merges looked-up coordinates into records by `NET.STA` key.
///
/// Records of stations absent from the map are left untouched; the
/// post-filter later keeps them, since the server-side query already
/// bounded them.
pub fn merge_coordinates(
    records: &mut [ChannelRecord],
    coordinates: &HashMap<String, (f64, f64)>,
) {
    for record in records.iter_mut() {
        if let Some(&(latitude, longitude)) = coordinates.get(&record.station_key()) {
            record.latitude = Some(latitude);
            record.longitude = Some(longitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::{MockHttpClient, MockRequest};

    const STATION_TEXT: &str = "\
#Network|Station|Latitude|Longitude|Elevation|SiteName|StartTime|EndTime
IU|ANMO|34.9459|-106.4572|1850.0|Albuquerque, New Mexico, USA|1989-08-29T00:00:00|
IU|COLA|64.8736|-147.8616|200.0|College Outpost, Alaska, USA|1996-06-06T00:00:00|
";

    fn record(network: &str, station: &str) -> ChannelRecord {
        ChannelRecord::parse(&format!(
            "{} {} 00 BHZ 2020-01-01T00:00:00 2020-01-01T01:00:00",
            network, station
        ))
        .unwrap()
    }

    #[test]
    fn test_parse_station_text() {
        let coordinates = parse_station_text(STATION_TEXT).unwrap();
        assert_eq!(coordinates.len(), 2);
        let (lat, lon) = coordinates["IU.ANMO"];
        assert!((lat - 34.9459).abs() < 1e-9);
        assert!((lon - (-106.4572)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        assert!(matches!(
            parse_station_text("IU|ANMO|34.9"),
            Err(FdsnError::MalformedStation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_coordinates() {
        assert!(matches!(
            parse_station_text("IU|ANMO|north|west"),
            Err(FdsnError::MalformedStation(_))
        ));
    }

    #[test]
    fn test_station_coordinates_posts_bulk_request() {
        let mock = MockHttpClient::with_response(Ok(STATION_TEXT.as_bytes().to_vec()));
        let records = vec![record("IU", "ANMO"), record("IU", "COLA")];

        let coordinates = station_coordinates(
            &mock,
            "http://service.iris.edu/fdsnws/station/1/",
            &records,
        )
        .unwrap();

        assert_eq!(coordinates.len(), 2);
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        match &requests[0] {
            MockRequest::Post(url, body) => {
                assert_eq!(url, "http://service.iris.edu/fdsnws/station/1/query");
                assert!(body.starts_with("level=station\nformat=text\n"));
                assert!(body.contains("IU ANMO 00 BHZ"));
                assert!(body.contains("IU COLA 00 BHZ"));
            }
            other => panic!("expected POST, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_coordinates_skips_unknown_stations() {
        let coordinates = parse_station_text(STATION_TEXT).unwrap();
        let mut records = vec![record("IU", "ANMO"), record("GE", "WLF")];

        merge_coordinates(&mut records, &coordinates);

        assert_eq!(records[0].latitude, Some(34.9459));
        assert_eq!(records[0].longitude, Some(-106.4572));
        assert_eq!(records[1].latitude, None);
        assert_eq!(records[1].longitude, None);
    }
}
