//! Bulk waveform retrieval.
//!
//! Consumes the request units produced by the planner: asks the IRIS
//! federator which channels are available inside a unit's domain and time
//! window, applies the domain's geographic post-filter to the routed
//! stations, then fetches miniSEED from each datacenter's dataselect service
//! and stores it under an event-scoped directory layout.
//!
//! Retrieval is best-effort per datacenter and per channel: a datacenter
//! with no data or a failing channel request is logged and skipped, while
//! malformed routing responses abort the unit.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::event::EventOrigin;
use crate::fdsn::{
    filter_providers, merge_coordinates, service_query_url, split_routing_response,
    station_coordinates, ChannelRecord, FdsnError,
};
use crate::http::{HttpClient, HttpError};
use crate::plan::RequestUnit;

/// Default federator endpoint used for availability queries.
const DEFAULT_FEDERATOR_URL: &str = "https://service.iris.edu/irisws/fedcatalog/1";

/// Default channel selector.
const DEFAULT_CHANNELS: &str = "BH?";

/// Time format accepted by FDSN services for query parameters.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Retrieval configuration.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Federator base URL.
    pub federator_url: String,
    /// Channel selector passed to the availability query, e.g. `BH?` or
    /// `BHZ,HHZ`.
    pub channels: String,
    /// Datacenter names to include. `None` keeps all.
    pub providers: Option<Vec<String>>,
    /// Datacenter names to exclude.
    pub exclude_providers: Option<Vec<String>>,
    /// Also store StationXML metadata for each selected station.
    pub store_station_xml: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            federator_url: DEFAULT_FEDERATOR_URL.to_string(),
            channels: DEFAULT_CHANNELS.to_string(),
            providers: None,
            exclude_providers: None,
            store_station_xml: true,
        }
    }
}

impl DownloadConfig {
    /// Set the federator base URL.
    pub fn with_federator_url(mut self, url: impl Into<String>) -> Self {
        self.federator_url = url.into();
        self
    }

    /// Set the channel selector.
    pub fn with_channels(mut self, channels: impl Into<String>) -> Self {
        self.channels = channels.into();
        self
    }

    /// Restrict retrieval to the given datacenters.
    pub fn with_providers(mut self, providers: Vec<String>) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Exclude the given datacenters.
    pub fn with_exclude_providers(mut self, providers: Vec<String>) -> Self {
        self.exclude_providers = Some(providers);
        self
    }

    /// Enable or disable StationXML storage.
    pub fn with_station_xml(mut self, store: bool) -> Self {
        self.store_station_xml = store;
        self
    }
}

/// Event-scoped storage layout for downloaded files.
///
/// Mirrors the conventional mass-download layout:
/// `mseed/{eventid}/NET.STA.LOC.CHA__start__end.mseed` and
/// `stations/{eventid}/NET.STA.xml` under a common root. Colons in
/// timestamps are replaced with dashes to keep filenames portable.
#[derive(Debug, Clone)]
pub struct NamingScheme {
    root: PathBuf,
}

impl NamingScheme {
    /// Creates a naming scheme rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path for one channel's miniSEED file.
    pub fn mseed_path(&self, origin: &EventOrigin, record: &ChannelRecord) -> PathBuf {
        let file = format!(
            "{}.{}.{}.{}__{}__{}.mseed",
            record.network,
            record.station,
            record.location,
            record.channel,
            record.start_time.replace(':', "-"),
            record.end_time.replace(':', "-"),
        );
        self.root.join("mseed").join(origin.event_id()).join(file)
    }

    /// Path for one station's StationXML file.
    pub fn stationxml_path(&self, origin: &EventOrigin, network: &str, station: &str) -> PathBuf {
        self.root
            .join("stations")
            .join(origin.event_id())
            .join(format!("{}.{}.xml", network, station))
    }
}

/// Outcome counts for one request unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DownloadReport {
    /// Channels the federator routed for the query.
    pub requested: usize,
    /// Channels remaining after the geographic post-filter.
    pub selected: usize,
    /// miniSEED files actually written.
    pub written: usize,
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} channels routed, {} selected, {} written",
            self.requested, self.selected, self.written
        )
    }
}

/// Errors from waveform retrieval.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Availability routing or metadata handling failed.
    #[error(transparent)]
    Fdsn(#[from] FdsnError),

    /// The federator could not be reached.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A downloaded file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Consumes request units and retrieves their waveforms.
pub trait Downloader {
    /// Retrieves one request unit's waveforms for `origin`, storing files
    /// according to `naming`.
    fn download(
        &self,
        origin: &EventOrigin,
        unit: &RequestUnit,
        naming: &NamingScheme,
    ) -> Result<DownloadReport, DownloadError>;
}

/// Downloader speaking to FDSN web services through the federator.
pub struct FdsnDownloader<C: HttpClient> {
    http_client: C,
    config: DownloadConfig,
}

impl<C: HttpClient> FdsnDownloader<C> {
    /// Creates a downloader with the given HTTP client and configuration.
    pub fn new(http_client: C, config: DownloadConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn availability_url(&self, unit: &RequestUnit) -> String {
        let mut url = format!(
            "{}/query?format=request&cha={}&starttime={}&endtime={}",
            self.config.federator_url,
            self.config.channels,
            unit.start_time.format(QUERY_TIME_FORMAT),
            unit.end_time.format(QUERY_TIME_FORMAT),
        );
        for (key, value) in unit.domain.query_parameters() {
            url.push_str(&format!("&{}={}", key, value));
        }
        url
    }

    fn dataselect_url(base: &str, record: &ChannelRecord) -> String {
        format!(
            "{}?net={}&sta={}&loc={}&cha={}&start={}&end={}",
            service_query_url(base),
            record.network,
            record.station,
            record.location,
            record.channel,
            record.start_time,
            record.end_time,
        )
    }

    fn write_file(path: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, bytes).map_err(|source| DownloadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fetches miniSEED for every record of one datacenter block.
    fn fetch_block_waveforms(
        &self,
        origin: &EventOrigin,
        naming: &NamingScheme,
        dataselect_base: &str,
        records: &[ChannelRecord],
    ) -> Result<usize, DownloadError> {
        let mut written = 0;
        for record in records {
            let url = Self::dataselect_url(dataselect_base, record);
            match self.http_client.get(&url) {
                Ok(bytes) if bytes.is_empty() => {
                    warn!(record = %record, "no waveform data returned");
                }
                Ok(bytes) => {
                    let path = naming.mseed_path(origin, record);
                    Self::write_file(&path, &bytes)?;
                    debug!(path = %path.display(), bytes = bytes.len(), "stored waveform");
                    written += 1;
                }
                Err(e) => {
                    warn!(record = %record, error = %e, "waveform request failed, skipping");
                }
            }
        }
        Ok(written)
    }

    /// Stores StationXML for each distinct station among `records`.
    fn fetch_station_xml(
        &self,
        origin: &EventOrigin,
        naming: &NamingScheme,
        station_base: &str,
        records: &[ChannelRecord],
    ) -> Result<(), DownloadError> {
        let mut stations: Vec<(String, String)> = records
            .iter()
            .map(|r| (r.network.clone(), r.station.clone()))
            .collect();
        stations.sort();
        stations.dedup();

        for (network, station) in stations {
            let url = format!(
                "{}?net={}&sta={}&level=response",
                service_query_url(station_base),
                network,
                station,
            );
            match self.http_client.get(&url) {
                Ok(bytes) if !bytes.is_empty() => {
                    let path = naming.stationxml_path(origin, &network, &station);
                    Self::write_file(&path, &bytes)?;
                }
                Ok(_) => warn!(%network, %station, "no station metadata returned"),
                Err(e) => warn!(%network, %station, error = %e, "station metadata request failed"),
            }
        }
        Ok(())
    }
}

impl<C: HttpClient> Downloader for FdsnDownloader<C> {
    fn download(
        &self,
        origin: &EventOrigin,
        unit: &RequestUnit,
        naming: &NamingScheme,
    ) -> Result<DownloadReport, DownloadError> {
        let url = self.availability_url(unit);
        debug!(%url, "querying channel availability");
        let response = self.http_client.get(&url)?;

        let blocks = split_routing_response(&String::from_utf8_lossy(&response))?;
        if blocks.is_empty() {
            info!("federator routed no channels for this request unit");
            return Ok(DownloadReport::default());
        }
        let blocks = filter_providers(
            blocks,
            self.config.providers.as_deref(),
            self.config.exclude_providers.as_deref(),
        )?;

        let mut report = DownloadReport::default();
        for block in blocks {
            report.requested += block.records.len();
            let mut records = block.records;

            // Merge coordinates so the domain's circular constraint can be
            // re-applied to what the rectangle query returned. Records of
            // stations the metadata misses stay in, already bounded by the
            // server query.
            if let Some(station_url) = &block.station_url {
                match station_coordinates(&self.http_client, station_url, &records) {
                    Ok(coordinates) => merge_coordinates(&mut records, &coordinates),
                    Err(e) => {
                        warn!(datacenter = %block.name, error = %e, "station coordinate lookup failed")
                    }
                }
            }
            records.retain(|record| match (record.latitude, record.longitude) {
                (Some(latitude), Some(longitude)) => unit.domain.is_in_domain(latitude, longitude),
                _ => true,
            });
            report.selected += records.len();

            let Some(dataselect_url) = &block.dataselect_url else {
                warn!(datacenter = %block.name, "no dataselect service advertised, skipping");
                continue;
            };
            report.written +=
                self.fetch_block_waveforms(origin, naming, dataselect_url, &records)?;

            if self.config.store_station_xml {
                if let Some(station_url) = &block.station_url {
                    self.fetch_station_xml(origin, naming, station_url, &records)?;
                }
            }
        }

        info!(%report, "request unit finished");
        Ok(report)
    }
}
