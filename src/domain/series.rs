//! # Hourly Series & Fixed Calendar
//!
//! The whole simulation runs on a fixed non-leap 365-day year indexed as
//! `day * 24 + hour`. All time series are allocated up front at their full
//! 8760-hour length; there is no dynamic growth and no leap-day handling.

use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_YEAR: usize = 365;
pub const MONTHS_PER_YEAR: usize = 12;
pub const HOURS_PER_YEAR: usize = DAYS_PER_YEAR * HOURS_PER_DAY;

/// Days per month for the fixed non-leap year.
pub const DAYS_IN_MONTH: [usize; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// First day-of-year index (0-based) for a 0-based month.
pub fn month_start_day(month: usize) -> usize {
    DAYS_IN_MONTH[..month].iter().sum()
}

/// 0-based month containing a 0-based day-of-year.
pub fn month_of_day(day: usize) -> usize {
    debug_assert!(day < DAYS_PER_YEAR);
    let mut remaining = day;
    for (month, &days) in DAYS_IN_MONTH.iter().enumerate() {
        if remaining < days {
            return month;
        }
        remaining -= days;
    }
    MONTHS_PER_YEAR - 1
}

/// Fixed seasonal month groupings used for day-profile aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// 0-based months belonging to this season.
    pub fn months(&self) -> [usize; 3] {
        match self {
            Season::Spring => [2, 3, 4],
            Season::Summer => [5, 6, 7],
            Season::Autumn => [8, 9, 10],
            Season::Winter => [11, 0, 1],
        }
    }
}

/// Ordered sequence of exactly 8760 hourly energy values (kWh).
///
/// Index arithmetic is `day * 24 + hour_of_day`. The inner array is boxed so
/// the series is cheap to move between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries(Box<[f64; HOURS_PER_YEAR]>);

impl HourlySeries {
    pub fn zeros() -> Self {
        Self(Box::new([0.0; HOURS_PER_YEAR]))
    }

    pub fn get(&self, day: usize, hour: usize) -> f64 {
        self.0[day * HOURS_PER_DAY + hour]
    }

    pub fn set(&mut self, day: usize, hour: usize, value: f64) {
        self.0[day * HOURS_PER_DAY + hour] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0[..]
    }

    pub fn annual_sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Mean value for each hour-of-day slot across all 365 days.
    pub fn daily_average_profile(&self) -> [f64; HOURS_PER_DAY] {
        let mut profile = [0.0; HOURS_PER_DAY];
        for day in 0..DAYS_PER_YEAR {
            for (hour, slot) in profile.iter_mut().enumerate() {
                *slot += self.get(day, hour);
            }
        }
        for slot in &mut profile {
            *slot /= DAYS_PER_YEAR as f64;
        }
        profile
    }
}

impl Default for HourlySeries {
    fn default() -> Self {
        Self::zeros()
    }
}

/// Round to 3 decimals, the precision used for reported day profiles.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round to 1 decimal, the precision used for reported annual battery totals.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
