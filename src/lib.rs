//! # PV Yield Simulator
//!
//! Estimates the annual energy yield and 10-year economic effect of a
//! residential rooftop PV installation, optionally paired with a home
//! battery. One request (site, equipment, twelve monthly meter readings,
//! tariff plan) is simulated hour by hour over a fixed 365-day reference
//! year of measured irradiance and priced against the feed-in tariff.
//!
//! ## Pipeline
//!
//! ```text
//! SimulationInput
//!     |> generation   (irradiance x equipment -> hourly kWh)
//!     |> consumption  (monthly meter readings -> hourly kWh)
//!     |> flows        (self-consumption / surplus split, seasonal profiles)
//!     |> battery      (daily charge/discharge cycle, optional)
//!     |> economics    (tariff pricing, 10-year FIT projection)
//! SimulationResult
//! ```
//!
//! Every stage is a pure function of its inputs; all file access happens
//! once at startup when the [`catalog::Catalogs`] bundle loads.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod simulation;
pub mod telemetry;

pub use error::SimulationError;
pub use simulation::{Engine, SimulationResult};
