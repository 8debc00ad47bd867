//! # Consumption Model
//!
//! Spreads monthly usage totals into an 8760-hour load series: each month's
//! daily average is distributed over the 24 hours of every day in that month
//! according to the usage-pattern's diurnal ratios.

use crate::catalog::Catalogs;
use crate::domain::series::{HourlySeries, DAYS_IN_MONTH, HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::domain::types::SimulationInput;
use crate::error::SimulationError;

/// Build the hourly consumption series for one request.
///
/// Fails with `UnknownUsagePattern` when the pattern name has no catalog
/// entry; the engine substitutes an all-zero series and continues.
pub fn simulate(
    input: &SimulationInput,
    catalogs: &Catalogs,
) -> Result<HourlySeries, SimulationError> {
    let ratios = catalogs.tariff.usage_ratios(&input.usage_pattern)?;
    Ok(spread(&input.monthly_usage_kwh, ratios))
}

/// Spread 12 monthly totals over the fixed 365-day year using 24 diurnal
/// ratios. Pure; exposed separately for direct testing.
pub fn spread(monthly_usage_kwh: &[f64; MONTHS_PER_YEAR], ratios: &[f64; HOURS_PER_DAY]) -> HourlySeries {
    let mut series = HourlySeries::zeros();
    let mut day_of_year = 0;
    for (month, &total) in monthly_usage_kwh.iter().enumerate() {
        let days = DAYS_IN_MONTH[month];
        let daily_average = total / days as f64;
        for _ in 0..days {
            for (hour, &ratio) in ratios.iter().enumerate() {
                series.set(day_of_year, hour, daily_average * ratio);
            }
            day_of_year += 1;
        }
    }
    series
}
