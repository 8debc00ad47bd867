//! # Flow Decomposition
//!
//! Pure per-hour split of generation and load into self-consumption and
//! surplus, plus the day-average and per-season 24-hour profiles the result
//! view is built from. No state; every hour is
//! `self = min(gen, cons)`, `surplus = max(0, gen − cons)`.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::domain::series::{
    month_start_day, round3, HourlySeries, Season, DAYS_IN_MONTH, DAYS_PER_YEAR, HOURS_PER_DAY,
};

#[inline]
pub fn self_consumption_at(generation: f64, consumption: f64) -> f64 {
    generation.min(consumption)
}

#[inline]
pub fn surplus_at(generation: f64, consumption: f64) -> f64 {
    (generation - consumption).max(0.0)
}

/// 24-hour day profile of one season's power flow, averaged over the days
/// actually in that season's slice of the 365-day year.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonProfile {
    pub generation: [f64; HOURS_PER_DAY],
    pub self_consumption: [f64; HOURS_PER_DAY],
    pub surplus_power: [f64; HOURS_PER_DAY],
    pub days: usize,
}

impl SeasonProfile {
    fn zeroed() -> Self {
        Self {
            generation: [0.0; HOURS_PER_DAY],
            self_consumption: [0.0; HOURS_PER_DAY],
            surplus_power: [0.0; HOURS_PER_DAY],
            days: 0,
        }
    }
}

/// The four fixed-season profiles.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalFlows {
    pub spring: SeasonProfile,
    pub summer: SeasonProfile,
    pub autumn: SeasonProfile,
    pub winter: SeasonProfile,
}

/// Output of the flow-decomposition stage.
#[derive(Debug, Clone, Serialize)]
pub struct FlowDecomposition {
    /// Annual sums, rounded to whole kWh.
    pub annual_self_consumption_kwh: f64,
    pub annual_surplus_kwh: f64,
    /// Mean per hour-of-day slot across all 365 days.
    pub daily_self_consumption: [f64; HOURS_PER_DAY],
    pub daily_surplus: [f64; HOURS_PER_DAY],
    pub seasonal: SeasonalFlows,
}

/// Decompose generation and load into self-consumption and surplus flows
/// with their daily and seasonal aggregates.
pub fn decompose(generation: &HourlySeries, consumption: &HourlySeries) -> FlowDecomposition {
    let mut annual_self = 0.0;
    let mut annual_surplus = 0.0;
    let mut daily_self = [0.0; HOURS_PER_DAY];
    let mut daily_surplus = [0.0; HOURS_PER_DAY];

    for day in 0..DAYS_PER_YEAR {
        for hour in 0..HOURS_PER_DAY {
            let generated = generation.get(day, hour);
            let consumed = consumption.get(day, hour);
            let own_use = self_consumption_at(generated, consumed);
            let exported = surplus_at(generated, consumed);
            annual_self += own_use;
            annual_surplus += exported;
            daily_self[hour] += own_use;
            daily_surplus[hour] += exported;
        }
    }

    for hour in 0..HOURS_PER_DAY {
        daily_self[hour] = round3(daily_self[hour] / DAYS_PER_YEAR as f64);
        daily_surplus[hour] = round3(daily_surplus[hour] / DAYS_PER_YEAR as f64);
    }

    let mut profiles = Season::iter().map(|season| season_profile(season, generation, consumption));
    let seasonal = SeasonalFlows {
        spring: profiles.next().unwrap_or_else(SeasonProfile::zeroed),
        summer: profiles.next().unwrap_or_else(SeasonProfile::zeroed),
        autumn: profiles.next().unwrap_or_else(SeasonProfile::zeroed),
        winter: profiles.next().unwrap_or_else(SeasonProfile::zeroed),
    };

    FlowDecomposition {
        annual_self_consumption_kwh: annual_self.round(),
        annual_surplus_kwh: annual_surplus.round(),
        daily_self_consumption: daily_self,
        daily_surplus,
        seasonal,
    }
}

fn season_profile(
    season: Season,
    generation: &HourlySeries,
    consumption: &HourlySeries,
) -> SeasonProfile {
    let mut profile = SeasonProfile::zeroed();
    for month in season.months() {
        let start = month_start_day(month);
        for day in start..start + DAYS_IN_MONTH[month] {
            profile.days += 1;
            for hour in 0..HOURS_PER_DAY {
                let generated = generation.get(day, hour);
                let consumed = consumption.get(day, hour);
                profile.generation[hour] += generated;
                profile.self_consumption[hour] += self_consumption_at(generated, consumed);
                profile.surplus_power[hour] += surplus_at(generated, consumed);
            }
        }
    }
    if profile.days > 0 {
        let days = profile.days as f64;
        for hour in 0..HOURS_PER_DAY {
            profile.generation[hour] = round3(profile.generation[hour] / days);
            profile.self_consumption[hour] = round3(profile.self_consumption[hour] / days);
            profile.surplus_power[hour] = round3(profile.surplus_power[hour] / days);
        }
    }
    profile
}
