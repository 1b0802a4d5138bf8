//! Federator routing response handling.
//!
//! A `format=request` response from the federator interleaves datacenter
//! headers, per-service URLs, and request lines:
//!
//! ```text
//! DATACENTER=IRISDMC,http://ds.iris.edu
//! STATIONSERVICE=http://service.iris.edu/fdsnws/station/1/
//! DATASELECTSERVICE=http://service.iris.edu/fdsnws/dataselect/1/
//! IU ANMO 00 BHZ 2020-01-01T00:00:00 2020-01-01T01:00:00
//!
//! DATACENTER=GEOFON,http://geofon.gfz-potsdam.de
//! ...
//! ```

use tracing::warn;

use super::{ChannelRecord, FdsnError};

/// One datacenter's share of a routed request.
#[derive(Debug, Clone, PartialEq)]
pub struct DatacenterBlock {
    /// Datacenter name, e.g. `IRISDMC`.
    pub name: String,
    /// Datacenter home URL from the header line.
    pub url: String,
    /// Dataselect service endpoint, if advertised.
    pub dataselect_url: Option<String>,
    /// Station service endpoint, if advertised.
    pub station_url: Option<String>,
    /// Request lines routed to this datacenter.
    pub records: Vec<ChannelRecord>,
}

impl DatacenterBlock {
    fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            dataselect_url: None,
            station_url: None,
            records: Vec::new(),
        }
    }
}

/// Splits a federator `format=request` response into datacenter blocks.
pub fn split_routing_response(text: &str) -> Result<Vec<DatacenterBlock>, FdsnError> {
    let mut blocks: Vec<DatacenterBlock> = Vec::new();
    let mut current: Option<DatacenterBlock> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("DATACENTER=") {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            let (name, url) = rest.split_once(',').unwrap_or((rest, ""));
            current = Some(DatacenterBlock::new(name.to_string(), url.to_string()));
            continue;
        }

        // Service URL lines, e.g. STATIONSERVICE=http://...
        if let Some((key, value)) = line.split_once('=') {
            if let Some(block) = current.as_mut() {
                match key {
                    "DATASELECTSERVICE" => block.dataselect_url = Some(value.to_string()),
                    "STATIONSERVICE" => block.station_url = Some(value.to_string()),
                    // Other services (event, availability) are not consumed.
                    _ => {}
                }
            }
            continue;
        }

        match current.as_mut() {
            Some(block) => block.records.push(ChannelRecord::parse(line)?),
            None => warn!(line, "request line before any DATACENTER header, skipping"),
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }
    Ok(blocks)
}

/// Filters datacenter blocks by provider name.
///
/// `include = None` keeps all providers; otherwise only the listed ones
/// survive. `exclude` is applied afterwards. Names compare
/// case-insensitively. Filtering a non-empty routing result down to nothing
/// fails with [`FdsnError::NoDataRemaining`]; an already-empty input stays
/// an empty output.
pub fn filter_providers(
    blocks: Vec<DatacenterBlock>,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Result<Vec<DatacenterBlock>, FdsnError> {
    let had_blocks = !blocks.is_empty();
    let filtered: Vec<DatacenterBlock> = blocks
        .into_iter()
        .filter(|block| {
            let included = include
                .map_or(true, |list| list.iter().any(|p| p.eq_ignore_ascii_case(&block.name)));
            let excluded = exclude
                .map_or(false, |list| list.iter().any(|p| p.eq_ignore_ascii_case(&block.name)));
            included && !excluded
        })
        .collect();

    if had_blocks && filtered.is_empty() {
        return Err(FdsnError::NoDataRemaining);
    }
    Ok(filtered)
}
