//! Plan command - print request units without downloading anything.

use std::path::PathBuf;

use clap::Args;

use quakefetch::plan::RequestUnit;

use super::common::{build_planner, WindowArgs};
use crate::catalog::{self, CatalogEvent};
use crate::error::CliError;

/// Arguments for the plan command.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Event catalog: CSV with time, longitude, latitude, depth, magnitude.
    pub catalog: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Print the plan as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// HTTP timeout in seconds for travel time queries.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Run the plan command.
pub fn run(args: PlanArgs) -> Result<(), CliError> {
    let events = catalog::read_catalog(&args.catalog)?;
    let config = args.window.to_config();
    let planner = build_planner(&config.model_name, args.timeout)?;

    for event in &events {
        let units = planner.plan(&event.origin, &config)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&units)?);
        } else {
            print_plan(event, &units);
        }
    }
    Ok(())
}

fn print_plan(event: &CatalogEvent, units: &[RequestUnit]) {
    let origin = &event.origin;
    let magnitude = event
        .magnitude
        .map(|m| format!(" M{:.1}", m))
        .unwrap_or_default();
    println!(
        "Event {}{} at ({:.3}, {:.3}), depth {:.1} km",
        origin.event_id(),
        magnitude,
        origin.latitude,
        origin.longitude,
        origin.depth_km
    );

    if units.is_empty() {
        println!("  no request units (empty plan)");
        return;
    }
    for unit in units {
        let band = match unit.domain.radius_band() {
            Some((minradius, maxradius)) => format!("{:6.1} - {:6.1} deg", minradius, maxradius),
            None => "global".to_string(),
        };
        println!(
            "  {}: {} -> {}",
            band,
            unit.start_time.format("%Y-%m-%dT%H:%M:%S%.3f"),
            unit.end_time.format("%Y-%m-%dT%H:%M:%S%.3f")
        );
    }
}
