//! FDSN request-format channel records.

use std::fmt;

use serde::Serialize;

use super::FdsnError;

/// One channel epoch in FDSN request format.
///
/// Parsed from and serialized back to the six-field line
/// `NET STA LOC CHA START END` used by the federator, station, and
/// dataselect services. Blank location codes travel as `--`. Time fields are
/// kept verbatim so a parsed line round-trips unchanged.
///
/// Coordinates are not part of the wire format; they are merged in later
/// from station metadata and drive the geographic post-filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRecord {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
    pub start_time: String,
    pub end_time: String,
    /// Station latitude in degrees, once merged from metadata.
    pub latitude: Option<f64>,
    /// Station longitude in degrees, once merged from metadata.
    pub longitude: Option<f64>,
}

impl ChannelRecord {
    /// Parses one request-format line.
    pub fn parse(line: &str) -> Result<Self, FdsnError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FdsnError::MalformedRecord(line.to_string()));
        }
        Ok(Self {
            network: fields[0].to_string(),
            station: fields[1].to_string(),
            location: fields[2].to_string(),
            channel: fields[3].to_string(),
            start_time: fields[4].to_string(),
            end_time: fields[5].to_string(),
            latitude: None,
            longitude: None,
        })
    }

    /// Key identifying the station this record belongs to, `NET.STA`.
    pub fn station_key(&self) -> String {
        format!("{}.{}", self.network, self.station)
    }
}

impl fmt::Display for ChannelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.network, self.station, self.location, self.channel, self.start_time, self.end_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "IU ANMO 00 BHZ 2020-01-01T00:00:00 2020-01-01T01:00:00";

    #[test]
    fn test_parse_request_line() {
        let record = ChannelRecord::parse(LINE).unwrap();
        assert_eq!(record.network, "IU");
        assert_eq!(record.station, "ANMO");
        assert_eq!(record.location, "00");
        assert_eq!(record.channel, "BHZ");
        assert_eq!(record.start_time, "2020-01-01T00:00:00");
        assert_eq!(record.end_time, "2020-01-01T01:00:00");
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
    }

    #[test]
    fn test_display_round_trips() {
        let record = ChannelRecord::parse(LINE).unwrap();
        assert_eq!(record.to_string(), LINE);
    }

    #[test]
    fn test_blank_location_code_round_trips() {
        let line = "GE WLF -- BHZ 2020-01-01T00:00:00 2020-01-01T01:00:00";
        let record = ChannelRecord::parse(line).unwrap();
        assert_eq!(record.location, "--");
        assert_eq!(record.to_string(), line);
    }

    #[test]
    fn test_wrong_field_count_is_error() {
        assert!(matches!(
            ChannelRecord::parse("IU ANMO 00 BHZ"),
            Err(FdsnError::MalformedRecord(_))
        ));
        assert!(matches!(
            ChannelRecord::parse(""),
            Err(FdsnError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_station_key() {
        let record = ChannelRecord::parse(LINE).unwrap();
        assert_eq!(record.station_key(), "IU.ANMO");
    }
}
