//! QuakeFetch - event-based seismic waveform dataset assembly.
//!
//! This library plans which stations, channels, and time windows to request
//! from FDSN data archives for a seismic event, and retrieves the resulting
//! waveforms. The planning core is the interesting part: instead of one
//! global time window per event, the allowed epicentral distance range can
//! be partitioned into annuli whose request windows are anchored to seismic
//! phase arrival times, so that each distance band records the phases it
//! actually sees.
//!
//! # Overview
//!
//! ```text
//! EventOrigin + WindowConfig ──► WindowPlanner ──► [RequestUnit] ──► Downloader
//!                                     │
//!                                     ▼
//!                              TravelTimeModel
//! ```
//!
//! - [`geo::GeoDomain`] - geographic station selection, split between
//!   server-side query parameters and a client-side post-filter.
//! - [`plan::WindowPlanner`] - turns an event and a [`plan::WindowConfig`]
//!   into an ordered list of [`plan::RequestUnit`]s.
//! - [`traveltime::TravelTimeModel`] - phase travel time lookup consumed by
//!   the planner, implemented against the IRIS web service.
//! - [`downloader::FdsnDownloader`] - fetches each request unit's waveforms
//!   through the FDSN federator and stores them event-scoped on disk.

pub mod downloader;
pub mod event;
pub mod fdsn;
pub mod geo;
pub mod http;
pub mod plan;
pub mod traveltime;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
