//! # Generation Model
//!
//! Turns mean-year irradiance plus equipment and mounting geometry into an
//! 8760-hour PV output series. Per hour:
//!
//! ```text
//! kWh = capacity_kW × irradiance_kWh/m² × inverter_eff × temp_coeff(month)
//!       × system_eff (0.95) × installation_coeff(face, tilt)
//! ```
//!
//! Source irradiance is in 0.01 MJ/m² and converts to kWh/m² via
//! `× 0.01 / 3.6`. The sentinel reading 8888 is skipped, contributing zero.

use serde::Serialize;

use crate::catalog::irradiance::MISSING_READING;
use crate::catalog::Catalogs;
use crate::domain::series::{
    month_of_day, HourlySeries, DAYS_PER_YEAR, HOURS_PER_DAY, MONTHS_PER_YEAR,
};
use crate::domain::types::SimulationInput;
use crate::error::SimulationError;

/// Fixed whole-system loss factor.
pub const SYSTEM_EFFICIENCY: f64 = 0.95;

/// Monthly temperature derating: winter 0.98, spring/early-summer and autumn
/// 0.93, high summer 0.88.
pub fn temperature_coefficient(month: usize) -> f64 {
    match month {
        11 | 0 | 1 => 0.98,        // Dec-Feb
        2 | 3 | 4 | 5 => 0.93,     // Mar-Jun
        6 | 7 => 0.88,             // Jul-Aug
        _ => 0.93,                 // Sep-Nov
    }
}

/// Output of the generation stage.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    #[serde(skip)]
    pub hourly: HourlySeries,
    /// Monthly sums rounded to whole kWh.
    pub monthly_kwh: [f64; MONTHS_PER_YEAR],
    /// Sum of the rounded monthly sums, not of the raw hourly values.
    pub annual_kwh: f64,
    /// Mean output per hour-of-day slot across 365 days.
    pub daily_profile: [f64; HOURS_PER_DAY],
}

impl GenerationOutput {
    pub fn zeroed() -> Self {
        Self {
            hourly: HourlySeries::zeros(),
            monthly_kwh: [0.0; MONTHS_PER_YEAR],
            annual_kwh: 0.0,
            daily_profile: [0.0; HOURS_PER_DAY],
        }
    }
}

/// Run the generation model for one request.
///
/// Fails with `MissingReferenceData` when the location label carries no id or
/// no irradiance record exists for it; the engine degrades that to a zeroed
/// output. Unmatched module/inverter models do not fail - they fall back to
/// 0 W and 0.95 respectively, which for a module means an all-zero series.
pub fn simulate(
    input: &SimulationInput,
    catalogs: &Catalogs,
) -> Result<GenerationOutput, SimulationError> {
    let irradiance = catalogs
        .irradiance
        .lookup(&input.location)
        .ok_or_else(|| SimulationError::MissingReferenceData(format!(
            "no irradiance record for location {:?}",
            input.location
        )))?;

    let module_power_w = catalogs.equipment.module_power_w(&input.module_model);
    let capacity_kw = module_power_w * f64::from(input.module_count) / 1000.0;
    let inverter_efficiency = catalogs.equipment.inverter_efficiency(&input.inverter_model);
    let installation_coefficient = catalogs
        .equipment
        .installation_coefficient(input.installation_face, input.tilt_angle_deg);

    let mut hourly = HourlySeries::zeros();
    let mut monthly_kwh = [0.0; MONTHS_PER_YEAR];

    for day in 0..DAYS_PER_YEAR {
        let month = month_of_day(day);
        let temp_coefficient = temperature_coefficient(month);
        for hour in 0..HOURS_PER_DAY {
            let reading = irradiance.reading(day, hour);
            if reading == MISSING_READING {
                continue;
            }
            let kwh = capacity_kw
                * reading * 0.01 / 3.6
                * inverter_efficiency
                * temp_coefficient
                * SYSTEM_EFFICIENCY
                * installation_coefficient;
            hourly.set(day, hour, kwh);
            monthly_kwh[month] += kwh;
        }
    }

    for month in &mut monthly_kwh {
        *month = month.round();
    }
    let annual_kwh = monthly_kwh.iter().sum();
    let daily_profile = hourly.daily_average_profile();

    Ok(GenerationOutput {
        hourly,
        monthly_kwh,
        annual_kwh,
        daily_profile,
    })
}
