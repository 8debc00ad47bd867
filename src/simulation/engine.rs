//! # Simulation Engine
//!
//! Orchestrates the five stages - generation, consumption, flow
//! decomposition, battery, economics - over one immutable request, and owns
//! the degrade-vs-abort policy:
//!
//! - missing reference data or unmatched catalog names degrade the affected
//!   stage to its documented zero/default output and the run continues;
//! - malformed input aborts and yields the canonical all-zero result with
//!   the `error` field set.
//!
//! No error or panic escapes `Engine::run`; the caller always receives a
//! well-formed, displayable result.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::Catalogs;
use crate::domain::series::{round3, HourlySeries, HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::domain::types::SimulationInput;
use crate::error::SimulationError;
use crate::simulation::battery::{self, BatteryPattern};
use crate::simulation::consumption;
use crate::simulation::economics::{self, EconomicEffects, YearlyEconomics, DEFAULT_BUY_PRICE};
use crate::simulation::flows::{self, SeasonalFlows};
use crate::simulation::generation::{self, GenerationOutput};

/// Annual flow totals without a battery.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSummary {
    pub annual_self_consumption: f64,
    pub annual_sell_electricity: f64,
}

/// Annual flow totals with the battery in the loop.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryFlowSummary {
    pub annual_self_consumption: f64,
    pub annual_sell_electricity: f64,
    pub annual_charge_total: f64,
    pub annual_discharge_total: f64,
}

/// Side-by-side battery-vs-no-battery comparison.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryComparison {
    pub without_battery: FlowSummary,
    pub with_battery: BatteryFlowSummary,
}

/// The complete structured result of one simulation request.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Annual generation (sum of rounded monthly figures, kWh).
    pub estimated_generation: f64,
    pub monthly_generation: [f64; MONTHS_PER_YEAR],
    /// Mean generation per hour-of-day slot (kWh).
    pub hourly_average_generation: [f64; HOURS_PER_DAY],
    pub annual_self_consumption: f64,
    pub annual_sell_electricity: f64,
    pub annual_self_consumption_savings: f64,
    pub annual_sell_revenue: f64,
    pub total_economic_effect: f64,
    pub buy_price_per_kwh: f64,
    pub sell_price_per_kwh: f64,
    pub hourly_self_consumption: [f64; HOURS_PER_DAY],
    pub hourly_surplus_power: [f64; HOURS_PER_DAY],
    pub seasonal_power_flow: SeasonalFlows,
    pub battery_pattern: BatteryPattern,
    pub battery_comparison: BatteryComparison,
    pub yearly_breakdown: Vec<YearlyEconomics>,
    pub total_10year_effect: f64,
    pub total_10year_sell_revenue: f64,
    pub total_10year_self_consumption_savings: f64,
    pub fit_period_years: u32,
    pub fit_sell_price: f64,
    pub post_fit_sell_price: f64,
    /// Set when the run aborted (or would otherwise be indistinguishable
    /// from a genuinely zero outcome).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationResult {
    /// The canonical all-zero result returned on abort, priced at the
    /// engine's configured default buy price.
    pub fn zeroed(error: Option<String>, buy_price_per_kwh: f64) -> Self {
        let flows = flows::decompose(&HourlySeries::zeros(), &HourlySeries::zeros());
        Self::assemble(
            GenerationOutput::zeroed(),
            flows,
            BatteryPattern::without_battery(),
            economics::project(0.0, 0.0, buy_price_per_kwh),
            error,
        )
    }

    fn assemble(
        generation: GenerationOutput,
        flows: flows::FlowDecomposition,
        battery: BatteryPattern,
        economics: EconomicEffects,
        error: Option<String>,
    ) -> Self {
        let mut hourly_average_generation = generation.daily_profile;
        for slot in &mut hourly_average_generation {
            *slot = round3(*slot);
        }
        Self {
            estimated_generation: generation.annual_kwh,
            monthly_generation: generation.monthly_kwh,
            hourly_average_generation,
            annual_self_consumption: economics.annual_self_consumption,
            annual_sell_electricity: economics.annual_sell_electricity,
            annual_self_consumption_savings: economics.annual_self_consumption_savings,
            annual_sell_revenue: economics.annual_sell_revenue,
            total_economic_effect: economics.total_economic_effect,
            buy_price_per_kwh: economics.buy_price_per_kwh,
            sell_price_per_kwh: economics.sell_price_per_kwh,
            hourly_self_consumption: flows.daily_self_consumption,
            hourly_surplus_power: flows.daily_surplus,
            seasonal_power_flow: flows.seasonal,
            battery_comparison: BatteryComparison {
                without_battery: FlowSummary {
                    annual_self_consumption: flows.annual_self_consumption_kwh,
                    annual_sell_electricity: flows.annual_surplus_kwh,
                },
                with_battery: BatteryFlowSummary {
                    annual_self_consumption: battery.annual_self_consumption_with_battery,
                    annual_sell_electricity: battery.annual_sell_electricity_with_battery,
                    annual_charge_total: battery.annual_charge_total,
                    annual_discharge_total: battery.annual_discharge_total,
                },
            },
            battery_pattern: battery,
            yearly_breakdown: economics.yearly_breakdown,
            total_10year_effect: economics.total_10year_effect,
            total_10year_sell_revenue: economics.total_10year_sell_revenue,
            total_10year_self_consumption_savings: economics.total_10year_self_consumption_savings,
            fit_period_years: economics.fit_period_years,
            fit_sell_price: economics.fit_sell_price,
            post_fit_sell_price: economics.post_fit_sell_price,
            error,
        }
    }
}

/// One engine instance per catalog snapshot; runs are pure functions of the
/// catalogs and the request, so instances are freely shareable across threads.
#[derive(Debug)]
pub struct Engine {
    catalogs: Catalogs,
    default_buy_price: f64,
}

impl Engine {
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            catalogs,
            default_buy_price: DEFAULT_BUY_PRICE,
        }
    }

    pub fn with_default_buy_price(mut self, price: f64) -> Self {
        self.default_buy_price = price;
        self
    }

    /// Run one simulation. Never fails: stage failures degrade per the
    /// documented policy, and an aborted run returns the canonical all-zero
    /// result with `error` set.
    pub fn run(&self, input: &SimulationInput) -> SimulationResult {
        if let Err(err) = validate(input) {
            warn!(%err, "simulation aborted");
            return SimulationResult::zeroed(Some(err.to_string()), self.default_buy_price);
        }

        let generation = match generation::simulate(input, &self.catalogs) {
            Ok(output) => output,
            Err(err) => {
                warn!(%err, location = %input.location, "generation degraded to zero");
                GenerationOutput::zeroed()
            }
        };

        let consumption = match consumption::simulate(input, &self.catalogs) {
            Ok(series) => series,
            Err(err) => {
                warn!(%err, pattern = %input.usage_pattern, "consumption degraded to zero");
                HourlySeries::zeros()
            }
        };

        let flows = flows::decompose(&generation.hourly, &consumption);

        let battery_spec = input.battery_model.as_deref().and_then(|model| {
            let spec = self.catalogs.equipment.battery(model);
            if spec.is_none() {
                warn!(model, "battery model not in catalog, simulating without battery");
            }
            spec
        });
        let battery = battery::simulate(&generation.hourly, &consumption, battery_spec);

        let buy_price = self.catalogs.tariff.buy_price(
            &input.utility_company,
            &input.contract_plan,
            self.default_buy_price,
        );

        // Battery-adjusted totals drive the economics when a battery is in
        // the loop; otherwise the plain decomposition totals do.
        let (annual_self, annual_sell) = if battery.has_battery {
            (
                battery.annual_self_consumption_with_battery,
                battery.annual_sell_electricity_with_battery,
            )
        } else {
            (flows.annual_self_consumption_kwh, flows.annual_surplus_kwh)
        };
        let economics = economics::project(annual_self, annual_sell, buy_price);

        info!(
            annual_generation_kwh = generation.annual_kwh,
            annual_self_consumption_kwh = annual_self,
            annual_sell_kwh = annual_sell,
            has_battery = battery.has_battery,
            "simulation complete"
        );

        SimulationResult::assemble(generation, flows, battery, economics, None)
    }
}

/// Reject values no stage can coerce safely. Usage figures are already
/// string-coerced at deserialization; what remains is non-finite numbers.
fn validate(input: &SimulationInput) -> Result<(), SimulationError> {
    for (month, &usage) in input.monthly_usage_kwh.iter().enumerate() {
        if !usage.is_finite() || usage < 0.0 {
            return Err(SimulationError::MalformedInput(format!(
                "monthly usage for month {} is not a non-negative finite number",
                month + 1
            )));
        }
    }
    Ok(())
}
