//! Common types and utilities shared across CLI commands.

use clap::Args;

use quakefetch::http::ReqwestClient;
use quakefetch::plan::{WindowConfig, WindowPlanner};
use quakefetch::traveltime::IrisTravelTimeClient;

use crate::error::CliError;

/// Windowing options shared by the `plan` and `fetch` commands.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Minimum epicentral distance in degrees.
    #[arg(long, default_value_t = 0.0)]
    pub minradius: f64,

    /// Maximum epicentral distance in degrees.
    #[arg(long, default_value_t = 180.0)]
    pub maxradius: f64,

    /// Comma-separated phases anchoring window start times (e.g. "P" or
    /// "ttp"). Requires --end-phases.
    #[arg(long, value_delimiter = ',')]
    pub start_phases: Option<Vec<String>>,

    /// Comma-separated phases anchoring window end times. Requires
    /// --start-phases.
    #[arg(long, value_delimiter = ',')]
    pub end_phases: Option<Vec<String>>,

    /// Seconds added to each window start; negative moves it earlier.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub start_offset: f64,

    /// Seconds added to each window end.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub end_offset: f64,

    /// Annulus width in degrees for phase-referenced windows.
    #[arg(long, default_value_t = 30.0)]
    pub radius_step: f64,

    /// Velocity model for travel times (iasp91, prem, ak135).
    #[arg(long, default_value = "iasp91")]
    pub model: String,

    /// Comma-separated data center names to restrict retrieval to.
    #[arg(long, value_delimiter = ',')]
    pub providers: Option<Vec<String>>,
}

impl WindowArgs {
    /// Translates CLI flags into the library configuration.
    ///
    /// Deliberately passes a lone `--start-phases`/`--end-phases` through so
    /// the planner reports the mismatch itself.
    pub fn to_config(&self) -> WindowConfig {
        let mut config = WindowConfig::default()
            .with_radius_range(self.minradius, self.maxradius)
            .with_offsets(self.start_offset, self.end_offset)
            .with_radius_step(self.radius_step)
            .with_model(self.model.clone());
        config.start_phases = self.start_phases.clone();
        config.end_phases = self.end_phases.clone();
        config.providers = self.providers.clone();
        config
    }
}

/// Builds a planner backed by the IRIS travel time service.
pub fn build_planner(
    model_name: &str,
    timeout_secs: u64,
) -> Result<WindowPlanner<IrisTravelTimeClient<ReqwestClient>>, CliError> {
    let http_client = ReqwestClient::with_timeout(timeout_secs)?;
    let model = IrisTravelTimeClient::new(http_client).with_model(model_name);
    Ok(WindowPlanner::new(model))
}
