//! # Battery Simulator
//!
//! Per-hour charge/discharge state machine with multi-constraint clipping,
//! run independently for each of the 365 days. The state of charge is reset
//! to 0 kWh at hour 0 of every day; this mirrors the sizing model's daily
//! cycle and is part of the contract, not an artifact.
//!
//! Per hour, in order:
//! 1. charge, only while below the effective capacity:
//!    `min(rated_kW, surplus × eff, headroom, generation)`;
//! 2. discharge, only when no charge happened this hour:
//!    `min(rated_kW × eff, SOC × eff, shortage, rated_kW)`;
//! 3. SOC update, clamped to `[0, effective_capacity]`;
//! 4. reporting-only recomputation of the hour's effective flows.

use serde::Serialize;

use crate::domain::series::{round1, round3, HourlySeries, DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::domain::types::BatterySpec;
use crate::simulation::flows::{self_consumption_at, surplus_at};

/// Battery charge/discharge pattern detail plus battery-adjusted annual flows.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryPattern {
    pub has_battery: bool,
    /// Mean charge per hour-of-day slot across 365 days (kWh).
    pub daily_charge_pattern: [f64; HOURS_PER_DAY],
    pub daily_discharge_pattern: [f64; HOURS_PER_DAY],
    /// Mean end-of-hour SOC per hour-of-day slot (kWh).
    pub daily_battery_level: [f64; HOURS_PER_DAY],
    /// Display capacity of the selected battery (kWh); reporting only.
    pub battery_capacity: f64,
    pub battery_power: f64,
    pub charge_discharge_efficiency: f64,
    pub annual_charge_total: f64,
    pub annual_discharge_total: f64,
    pub annual_self_consumption_with_battery: f64,
    pub annual_sell_electricity_with_battery: f64,
}

impl BatteryPattern {
    /// The canonical "no battery" result.
    pub fn without_battery() -> Self {
        Self {
            has_battery: false,
            daily_charge_pattern: [0.0; HOURS_PER_DAY],
            daily_discharge_pattern: [0.0; HOURS_PER_DAY],
            daily_battery_level: [0.0; HOURS_PER_DAY],
            battery_capacity: 0.0,
            battery_power: 0.0,
            charge_discharge_efficiency: 0.0,
            annual_charge_total: 0.0,
            annual_discharge_total: 0.0,
            annual_self_consumption_with_battery: 0.0,
            annual_sell_electricity_with_battery: 0.0,
        }
    }
}

/// Simulate the battery against the generation and consumption series.
///
/// `spec == None`, or a spec with non-positive effective capacity or rated
/// power, yields the canonical no-battery result - downstream economics then
/// use the un-adjusted flow totals.
pub fn simulate(
    generation: &HourlySeries,
    consumption: &HourlySeries,
    spec: Option<&BatterySpec>,
) -> BatteryPattern {
    let Some(spec) = spec else {
        return BatteryPattern::without_battery();
    };
    let effective_capacity = spec.effective_capacity();
    let rated_power = spec.rated_output_kw;
    if effective_capacity <= 0.0 || rated_power <= 0.0 {
        return BatteryPattern::without_battery();
    }
    let efficiency = spec.efficiency();

    let mut daily_charge = [0.0; HOURS_PER_DAY];
    let mut daily_discharge = [0.0; HOURS_PER_DAY];
    let mut daily_level = [0.0; HOURS_PER_DAY];
    let mut annual_charge = 0.0;
    let mut annual_discharge = 0.0;
    let mut annual_self = 0.0;
    let mut annual_sell = 0.0;

    for day in 0..DAYS_PER_YEAR {
        // Days are independent: the battery starts every day empty.
        let mut soc = 0.0_f64;

        for hour in 0..HOURS_PER_DAY {
            let generated = generation.get(day, hour);
            let consumed = consumption.get(day, hour);

            // Step A: charge, clipped by rated power, efficiency-derated
            // surplus, remaining headroom, and total generation.
            let mut charge = 0.0;
            if soc < effective_capacity {
                let surplus = surplus_at(generated, consumed);
                charge = rated_power
                    .min(surplus * efficiency)
                    .min(effective_capacity - soc)
                    .min(generated);
            }

            // Step B: discharge, mutually exclusive with charging.
            let mut discharge = 0.0;
            if charge == 0.0 {
                let shortage = (consumed - generated).max(0.0);
                discharge = (rated_power * efficiency)
                    .min(soc * efficiency)
                    .min(shortage)
                    .min(rated_power);
            }

            // Step C: SOC update, hard-bounded.
            soc = (soc + charge - discharge).clamp(0.0, effective_capacity);

            // Step D: effective flows for reporting.
            let (own_use, exported) = if charge > 0.0 {
                (
                    self_consumption_at(generated, consumed),
                    (generated - consumed - charge).max(0.0),
                )
            } else if discharge > 0.0 {
                (
                    (generated + discharge).min(consumed),
                    (generated - (consumed - discharge).max(0.0)).max(0.0),
                )
            } else {
                (
                    self_consumption_at(generated, consumed),
                    surplus_at(generated, consumed),
                )
            };

            annual_charge += charge;
            annual_discharge += discharge;
            annual_self += own_use;
            annual_sell += exported;
            daily_charge[hour] += charge;
            daily_discharge[hour] += discharge;
            daily_level[hour] += soc;
        }
    }

    for hour in 0..HOURS_PER_DAY {
        daily_charge[hour] = round3(daily_charge[hour] / DAYS_PER_YEAR as f64);
        daily_discharge[hour] = round3(daily_discharge[hour] / DAYS_PER_YEAR as f64);
        daily_level[hour] = round3(daily_level[hour] / DAYS_PER_YEAR as f64);
    }

    BatteryPattern {
        has_battery: true,
        daily_charge_pattern: daily_charge,
        daily_discharge_pattern: daily_discharge,
        daily_battery_level: daily_level,
        battery_capacity: spec.capacity_kwh,
        battery_power: rated_power,
        charge_discharge_efficiency: efficiency,
        annual_charge_total: round1(annual_charge),
        annual_discharge_total: round1(annual_discharge),
        annual_self_consumption_with_battery: round1(annual_self),
        annual_sell_electricity_with_battery: round1(annual_sell),
    }
}
