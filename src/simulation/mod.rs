//! # Yield Simulation Module
//!
//! The five pure stages of the annual yield simulation plus the engine that
//! chains them over one request.
//!
//! ## Components
//!
//! - **Generation**: hourly PV output from measured irradiance, equipment
//!   efficiency, and seasonal temperature derating
//! - **Consumption**: monthly meter readings spread into an hourly demand
//!   series via a named usage pattern
//! - **Flows**: hour-by-hour split of generation into self-consumed and
//!   surplus power, with seasonal day profiles
//! - **Battery**: daily charge/discharge cycle over the flow series and its
//!   effect on annual self-consumption and export
//! - **Economics**: tariff-priced annual savings and the 10-year FIT
//!   projection
//! - **Engine**: orchestration, input validation, and the degrade-vs-abort
//!   error policy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pv_yield_sim::catalog::Catalogs;
//! use pv_yield_sim::domain::types::SimulationInput;
//! use pv_yield_sim::simulation::Engine;
//!
//! let catalogs = Catalogs::load(std::path::Path::new("data"));
//! let engine = Engine::new(catalogs);
//!
//! let input = SimulationInput {
//!     location: "Maebashi (44166)".to_string(),
//!     ..Default::default()
//! };
//! let result = engine.run(&input);
//! println!("{} kWh/year", result.estimated_generation);
//! ```

pub mod battery;
pub mod consumption;
pub mod economics;
pub mod engine;
pub mod flows;
pub mod generation;

pub use battery::BatteryPattern;
pub use economics::{EconomicEffects, YearlyEconomics};
pub use engine::{BatteryComparison, Engine, SimulationResult};
pub use flows::{FlowDecomposition, SeasonProfile, SeasonalFlows};
pub use generation::GenerationOutput;
