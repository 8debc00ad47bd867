//! # Economic Model
//!
//! Folds the annual self-consumption and surplus totals into a 10-year
//! projection under the fixed feed-in-tariff schedule: a high sell rate for
//! years 1-4, a lower rate for years 5-10. Only the buy price comes from the
//! tariff catalog; the sell schedule is independent of simulation inputs, and
//! both annual totals are held constant across the projection.

use serde::Serialize;

/// Years the elevated feed-in rate applies.
pub const FIT_PERIOD_YEARS: u32 = 4;
/// Sell price during the FIT period (per kWh).
pub const FIT_SELL_PRICE: f64 = 24.0;
/// Sell price after the FIT period ends.
pub const POST_FIT_SELL_PRICE: f64 = 8.3;
/// Buy price assumed when no plan rate can be resolved.
pub const DEFAULT_BUY_PRICE: f64 = 30.0;
/// Length of the projection.
pub const PROJECTION_YEARS: u32 = 10;

/// Sell price for a 1-based projection year.
pub fn sell_price_for_year(year: u32) -> f64 {
    if year <= FIT_PERIOD_YEARS {
        FIT_SELL_PRICE
    } else {
        POST_FIT_SELL_PRICE
    }
}

/// One projection year of the breakdown. Monetary figures in whole yen.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyEconomics {
    pub year: u32,
    pub sell_price: f64,
    pub sell_revenue: f64,
    pub self_consumption_kwh: f64,
    pub self_consumption_savings: f64,
    pub total_effect: f64,
    pub cumulative_total_effect: f64,
}

/// The full economic projection plus flat first-year figures.
#[derive(Debug, Clone, Serialize)]
pub struct EconomicEffects {
    pub annual_self_consumption: f64,
    pub annual_sell_electricity: f64,
    /// First-year figures, kept flat for display compatibility.
    pub annual_self_consumption_savings: f64,
    pub annual_sell_revenue: f64,
    pub total_economic_effect: f64,
    pub buy_price_per_kwh: f64,
    pub sell_price_per_kwh: f64,
    pub yearly_breakdown: Vec<YearlyEconomics>,
    pub total_10year_effect: f64,
    pub total_10year_sell_revenue: f64,
    pub total_10year_self_consumption_savings: f64,
    pub fit_period_years: u32,
    pub fit_sell_price: f64,
    pub post_fit_sell_price: f64,
}

impl EconomicEffects {
    pub fn zeroed() -> Self {
        project(0.0, 0.0, DEFAULT_BUY_PRICE)
    }
}

/// Project `PROJECTION_YEARS` years of sell revenue and self-consumption
/// savings from the annual totals and the resolved buy price.
pub fn project(
    annual_self_consumption: f64,
    annual_sell_electricity: f64,
    buy_price_per_kwh: f64,
) -> EconomicEffects {
    let mut yearly_breakdown = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut cumulative = 0.0;
    let mut total_sell_revenue = 0.0;
    let mut total_savings = 0.0;

    for year in 1..=PROJECTION_YEARS {
        let sell_price = sell_price_for_year(year);
        let sell_revenue = annual_sell_electricity * sell_price;
        let savings = annual_self_consumption * buy_price_per_kwh;
        let total_effect = sell_revenue + savings;
        cumulative += total_effect;
        total_sell_revenue += sell_revenue;
        total_savings += savings;

        yearly_breakdown.push(YearlyEconomics {
            year,
            sell_price,
            sell_revenue: sell_revenue.round(),
            self_consumption_kwh: annual_self_consumption.round(),
            self_consumption_savings: savings.round(),
            total_effect: total_effect.round(),
            cumulative_total_effect: cumulative.round(),
        });
    }

    let first_year = &yearly_breakdown[0];
    EconomicEffects {
        annual_self_consumption: annual_self_consumption.round(),
        annual_sell_electricity: annual_sell_electricity.round(),
        annual_self_consumption_savings: first_year.self_consumption_savings,
        annual_sell_revenue: first_year.sell_revenue,
        total_economic_effect: first_year.total_effect,
        buy_price_per_kwh,
        sell_price_per_kwh: first_year.sell_price,
        total_10year_effect: cumulative.round(),
        total_10year_sell_revenue: total_sell_revenue.round(),
        total_10year_self_consumption_savings: total_savings.round(),
        fit_period_years: FIT_PERIOD_YEARS,
        fit_sell_price: FIT_SELL_PRICE,
        post_fit_sell_price: POST_FIT_SELL_PRICE,
        yearly_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, FIT_SELL_PRICE)]
    #[case(4, FIT_SELL_PRICE)]
    #[case(5, POST_FIT_SELL_PRICE)]
    #[case(10, POST_FIT_SELL_PRICE)]
    fn test_sell_price_schedule(#[case] year: u32, #[case] expected: f64) {
        assert_eq!(sell_price_for_year(year), expected);
    }

    #[test]
    fn test_ten_year_projection() {
        // 2000 kWh self-consumed at 30/kWh, 3000 kWh sold.
        let effects = project(2000.0, 3000.0, 30.0);
        assert_eq!(effects.yearly_breakdown.len(), 10);

        // Year 1: 2000×30 + 3000×24 = 132000.
        let year1 = &effects.yearly_breakdown[0];
        assert_relative_eq!(year1.total_effect, 132_000.0);
        assert_relative_eq!(effects.total_economic_effect, 132_000.0);

        // Year 5: 2000×30 + 3000×8.3 = 84900.
        let year5 = &effects.yearly_breakdown[4];
        assert_relative_eq!(year5.sell_price, POST_FIT_SELL_PRICE);
        assert_relative_eq!(year5.total_effect, 84_900.0);

        // Cumulative after 10 years: 4×132000 + 6×84900 = 1037400.
        let year10 = &effects.yearly_breakdown[9];
        assert_relative_eq!(year10.cumulative_total_effect, 1_037_400.0);
        assert_relative_eq!(effects.total_10year_effect, 1_037_400.0);
    }

    #[test]
    fn test_cumulative_is_running_sum() {
        let effects = project(1234.5, 678.9, 27.5);
        let mut running = 0.0;
        for year in &effects.yearly_breakdown {
            running += year.sell_revenue + year.self_consumption_savings;
            // Per-year rounding happens on the unrounded running sum, so
            // allow a yen of drift against the rounded components.
            assert!((year.cumulative_total_effect - running).abs() <= effects.yearly_breakdown.len() as f64);
        }
    }

    #[test]
    fn test_zeroed_effects() {
        let effects = EconomicEffects::zeroed();
        assert_eq!(effects.total_10year_effect, 0.0);
        assert_eq!(effects.buy_price_per_kwh, DEFAULT_BUY_PRICE);
        assert_eq!(effects.sell_price_per_kwh, FIT_SELL_PRICE);
        assert_eq!(effects.yearly_breakdown.len(), 10);
    }
}
