//! Request-window planning for event-based waveform retrieval.
//!
//! Given an event origin and a [`WindowConfig`], the [`WindowPlanner`]
//! produces the ordered list of [`RequestUnit`]s to hand to a downloader.
//! Without reference phases the plan is a single unit spanning a fixed
//! offset window around the origin time. With reference phases the allowed
//! epicentral distance range is partitioned into annuli of
//! `radius_step_deg` width, and each annulus gets its own window anchored to
//! phase arrival times at its inner and outer edges: close stations record
//! the phase minutes before distant ones, so a single global window would
//! either truncate distant records or over-request close ones.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::event::EventOrigin;
use crate::geo::GeoDomain;
use crate::traveltime::{TravelTimeError, TravelTimeModel};

/// Default velocity model name.
const DEFAULT_MODEL: &str = "iasp91";

/// Default annulus width in degrees.
const DEFAULT_RADIUS_STEP_DEG: f64 = 30.0;

/// Epicentral distances never exceed half the great circle.
const MAX_DISTANCE_DEG: f64 = 180.0;

/// Windowing configuration for one planning call.
///
/// Defaults mirror a whole-globe request with origin-anchored windows:
/// radii 0-180 degrees, no reference phases, zero offsets, 30 degree step,
/// iasp91 model, all providers.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Minimum epicentral distance in degrees.
    pub minradius: f64,
    /// Maximum epicentral distance in degrees.
    pub maxradius: f64,
    /// Phases anchoring window start times. Must be set together with
    /// `end_phases`; `None` anchors windows to the origin time instead.
    pub start_phases: Option<Vec<String>>,
    /// Phases anchoring window end times. Must be set together with
    /// `start_phases`.
    pub end_phases: Option<Vec<String>>,
    /// Seconds added to each window start (negative moves it earlier).
    pub start_offset_secs: f64,
    /// Seconds added to each window end.
    pub end_offset_secs: f64,
    /// Annulus width in degrees.
    pub radius_step_deg: f64,
    /// Velocity model name passed to the travel time service.
    pub model_name: String,
    /// Data center names to restrict retrieval to. `None` means all.
    pub providers: Option<Vec<String>>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            minradius: 0.0,
            maxradius: MAX_DISTANCE_DEG,
            start_phases: None,
            end_phases: None,
            start_offset_secs: 0.0,
            end_offset_secs: 0.0,
            radius_step_deg: DEFAULT_RADIUS_STEP_DEG,
            model_name: DEFAULT_MODEL.to_string(),
            providers: None,
        }
    }
}

impl WindowConfig {
    /// Set the allowed epicentral distance range in degrees.
    pub fn with_radius_range(mut self, minradius: f64, maxradius: f64) -> Self {
        self.minradius = minradius;
        self.maxradius = maxradius;
        self
    }

    /// Anchor windows to phase arrivals instead of the origin time.
    pub fn with_reference_phases(
        mut self,
        start_phases: Vec<String>,
        end_phases: Vec<String>,
    ) -> Self {
        self.start_phases = Some(start_phases);
        self.end_phases = Some(end_phases);
        self
    }

    /// Set the start/end offsets in seconds.
    pub fn with_offsets(mut self, start_offset_secs: f64, end_offset_secs: f64) -> Self {
        self.start_offset_secs = start_offset_secs;
        self.end_offset_secs = end_offset_secs;
        self
    }

    /// Set the annulus width in degrees.
    pub fn with_radius_step(mut self, radius_step_deg: f64) -> Self {
        self.radius_step_deg = radius_step_deg;
        self
    }

    /// Set the velocity model name.
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Restrict retrieval to the given data centers.
    pub fn with_providers(mut self, providers: Vec<String>) -> Self {
        self.providers = Some(providers);
        self
    }

    fn validate(&self) -> Result<(), PlanError> {
        if self.start_phases.is_some() != self.end_phases.is_some() {
            return Err(PlanError::MismatchedReferencePhases);
        }
        if !(self.radius_step_deg > 0.0) {
            return Err(PlanError::NonPositiveRadiusStep(self.radius_step_deg));
        }
        if self.minradius > MAX_DISTANCE_DEG {
            return Err(PlanError::RadiusOutOfRange(self.minradius));
        }
        Ok(())
    }
}

/// One geographic/time request handed to the downloader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestUnit {
    /// Stations to request, as a circle (annulus) around the epicenter.
    pub domain: GeoDomain,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
}

/// Errors from request planning.
#[derive(Debug, Error)]
pub enum PlanError {
    /// `start_phases` and `end_phases` must be either both set or both
    /// unset.
    #[error("start_phases and end_phases must be either both set or both unset")]
    MismatchedReferencePhases,

    /// The annulus width must be positive.
    #[error("radius step must be positive, got {0}")]
    NonPositiveRadiusStep(f64),

    /// The minimum radius lies beyond half the great circle.
    #[error("minimum radius {0} exceeds 180 degrees")]
    RadiusOutOfRange(f64),

    /// A travel time lookup failed; a window bound cannot be approximated,
    /// so the whole plan is abandoned.
    #[error(transparent)]
    TravelTime(#[from] TravelTimeError),
}

/// Plans waveform request windows for seismic events.
pub struct WindowPlanner<M: TravelTimeModel> {
    model: M,
}

impl<M: TravelTimeModel> WindowPlanner<M> {
    /// Creates a planner querying `model` for phase travel times.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Plans the ordered request units for one event.
    ///
    /// Returns a single origin-anchored unit when no reference phases are
    /// configured, or one unit per distance annulus otherwise, in ascending
    /// distance order. An empty plan (e.g. `minradius > maxradius`) is valid
    /// output, not an error.
    pub fn plan(
        &self,
        origin: &EventOrigin,
        config: &WindowConfig,
    ) -> Result<Vec<RequestUnit>, PlanError> {
        config.validate()?;

        match (&config.start_phases, &config.end_phases) {
            (None, None) => Ok(vec![RequestUnit {
                domain: GeoDomain::circle(
                    origin.latitude,
                    origin.longitude,
                    config.minradius,
                    config.maxradius,
                ),
                start_time: offset_time(origin.time, config.start_offset_secs),
                end_time: offset_time(origin.time, config.end_offset_secs),
            }]),
            (Some(start_phases), Some(end_phases)) => {
                self.phase_referenced_units(origin, config, start_phases, end_phases)
            }
            // validate() rejected the mixed states already
            _ => Err(PlanError::MismatchedReferencePhases),
        }
    }

    fn phase_referenced_units(
        &self,
        origin: &EventOrigin,
        config: &WindowConfig,
        start_phases: &[String],
        end_phases: &[String],
    ) -> Result<Vec<RequestUnit>, PlanError> {
        let step = config.radius_step_deg;
        let mut units = Vec::new();

        // Edge radii come from multiplication, not accumulation, so bin
        // edges stay exact for step values like 30.0.
        for index in 0u64.. {
            let radius = index as f64 * step;
            if radius >= MAX_DISTANCE_DEG {
                break;
            }
            // Annuli entirely outside the configured range are dropped
            // silently; partially overlapping ones are clipped.
            if radius + step < config.minradius || radius > config.maxradius {
                continue;
            }
            let inner = radius.max(config.minradius);
            let outer = (radius + step).min(config.maxradius);
            if inner >= outer {
                // Degenerate after clipping (also covers minradius >
                // maxradius, which yields an empty plan).
                continue;
            }

            let start_time = offset_time(
                origin.time,
                self.first_arrival_secs(origin.depth_km, inner, start_phases)?
                    + config.start_offset_secs,
            );
            let end_time = offset_time(
                origin.time,
                self.last_arrival_secs(origin.depth_km, outer, end_phases)?
                    + config.end_offset_secs,
            );

            debug!(
                inner,
                outer,
                %start_time,
                %end_time,
                "planned annulus window"
            );
            units.push(RequestUnit {
                domain: GeoDomain::circle(origin.latitude, origin.longitude, inner, outer),
                start_time,
                end_time,
            });
        }

        Ok(units)
    }

    /// Earliest arrival among `phases`, anchoring an annulus start.
    fn first_arrival_secs(
        &self,
        depth_km: f64,
        distance_deg: f64,
        phases: &[String],
    ) -> Result<f64, PlanError> {
        let arrivals = self.model.travel_times(depth_km, distance_deg, phases)?;
        let first = arrivals
            .first()
            .ok_or_else(|| phase_not_found(depth_km, distance_deg, phases))?;
        Ok(first.time_secs)
    }

    /// Latest arrival among `phases`, anchoring an annulus end. Taking the
    /// last entry maximizes coverage when several phases are listed.
    fn last_arrival_secs(
        &self,
        depth_km: f64,
        distance_deg: f64,
        phases: &[String],
    ) -> Result<f64, PlanError> {
        let arrivals = self.model.travel_times(depth_km, distance_deg, phases)?;
        let last = arrivals
            .last()
            .ok_or_else(|| phase_not_found(depth_km, distance_deg, phases))?;
        Ok(last.time_secs)
    }
}

/// Guard against model implementations returning an empty arrival list
/// instead of the error their contract requires.
fn phase_not_found(depth_km: f64, distance_deg: f64, phases: &[String]) -> PlanError {
    PlanError::TravelTime(TravelTimeError::PhaseNotFound {
        depth_km,
        distance_deg,
        phases: phases.to_vec(),
    })
}

/// Applies a signed second offset to an absolute timestamp with
/// microsecond resolution.
fn offset_time(base: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    base + Duration::microseconds((seconds * 1_000_000.0).round() as i64)
}
