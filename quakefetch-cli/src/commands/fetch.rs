//! Fetch command - plan request windows and download the waveforms.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use quakefetch::downloader::{DownloadConfig, Downloader, FdsnDownloader, NamingScheme};
use quakefetch::http::ReqwestClient;

use super::common::{build_planner, WindowArgs};
use crate::catalog;
use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Event catalog: CSV with time, longitude, latitude, depth, magnitude.
    pub catalog: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Directory to store mseed/ and stations/ under.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Channel selector for availability queries, e.g. "BH?" or "BHZ,HHZ".
    #[arg(long, default_value = "BH?")]
    pub channels: String,

    /// Comma-separated data center names to exclude.
    #[arg(long, value_delimiter = ',')]
    pub exclude_providers: Option<Vec<String>>,

    /// Skip StationXML metadata downloads.
    #[arg(long)]
    pub no_station_xml: bool,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let events = catalog::read_catalog(&args.catalog)?;
    let config = args.window.to_config();
    let planner = build_planner(&config.model_name, args.timeout)?;

    let mut download_config = DownloadConfig::default()
        .with_channels(args.channels.clone())
        .with_station_xml(!args.no_station_xml);
    download_config.providers = config.providers.clone();
    download_config.exclude_providers = args.exclude_providers.clone();

    let downloader = FdsnDownloader::new(
        ReqwestClient::with_timeout(args.timeout)?,
        download_config,
    );
    let naming = NamingScheme::new(&args.output_dir);

    println!("QuakeFetch v{}", quakefetch::VERSION);
    println!("Catalog: {} ({} events)", args.catalog.display(), events.len());
    println!("Output:  {}", args.output_dir.display());
    println!();

    for event in &events {
        let units = planner.plan(&event.origin, &config)?;
        info!(
            event = %event.origin.event_id(),
            units = units.len(),
            "planned request units"
        );
        println!("Event {}:", event.origin.event_id());
        if units.is_empty() {
            println!("  nothing to download (empty plan)");
            continue;
        }
        for unit in &units {
            let report = downloader.download(&event.origin, unit, &naming)?;
            let band = match unit.domain.radius_band() {
                Some((minradius, maxradius)) => {
                    format!("{:6.1} - {:6.1} deg", minradius, maxradius)
                }
                None => "global".to_string(),
            };
            println!("  {}: {}", band, report);
        }
    }
    Ok(())
}
