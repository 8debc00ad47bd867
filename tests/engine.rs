//! End-to-end engine tests over a small on-disk catalog bundle.
//!
//! The fixture site: a 1 kW array (4 x 250 W modules), an ideal inverter,
//! and a mean year in which exactly one hour per day (12:00) receives
//! irradiance. The household draws a flat 300 kWh every month on a uniform
//! diurnal pattern, so every expected figure below can be worked out by hand.

use std::fs;
use std::path::Path;

use pv_yield_sim::catalog::Catalogs;
use pv_yield_sim::domain::types::SimulationInput;
use pv_yield_sim::simulation::Engine;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// One NEDO file: 365 rows, reading 360 (= 1.0 kWh/m² equivalent) at noon,
/// zero elsewhere, with one sentinel day to prove 8888 is skipped.
fn write_irradiance(dir: &Path) {
    let mut rows = Vec::with_capacity(365);
    for day in 0..365 {
        let mut row: Vec<serde_json::Value> =
            vec!["44166".into(), 1.into(), 1.into(), (day + 1).into()];
        for hour in 0..24 {
            let reading = if hour != 12 {
                0
            } else if day == 180 {
                8888
            } else {
                360
            };
            row.push(reading.into());
        }
        row.push(0.into());
        row.push(0.into());
        row.push(360.into());
        rows.push(serde_json::Value::Array(row));
    }
    let file = serde_json::json!({ "daily_data": rows });
    write(
        &dir.join("nedo/nedo_solar_data/hm44166year.json"),
        &file.to_string(),
    );
}

fn write_catalogs(dir: &Path) {
    write_irradiance(dir);
    write(
        &dir.join("module_data.json"),
        r#"{"modules": [{"model": "M-250", "nominal_power": 250.0}]}"#,
    );
    write(
        &dir.join("inverter_data.json"),
        r#"{"inverters": [{"model_name": "INV-1", "efficiency": 1.0}]}"#,
    );
    write(
        &dir.join("battery_data.json"),
        r#"{"batteries": [{
            "model_name": "B-6",
            "capacity_kwh": 6.0,
            "rated_output_kw": 3.0,
            "charge_discharge_efficiency_percent": 100.0
        }]}"#,
    );
    write(
        &dir.join("installation_coefficients.json"),
        r#"{"coefficients": {"south": {"30": 1.0}}}"#,
    );
    let flat = vec![1.0 / 24.0; 24];
    write(
        &dir.join("usage_patterns.json"),
        &serde_json::json!({ "flat": flat }).to_string(),
    );
    write(
        &dir.join("tepco_plans.json"),
        r#"{"active_plans": {"plans": [
            {"plan_name": "standard", "usage_rate_tier2": 27.0}
        ]}}"#,
    );
}

fn fixture_input() -> SimulationInput {
    SimulationInput {
        location: "前橋（44166）".to_string(),
        module_model: "M-250".to_string(),
        module_count: 4,
        inverter_model: "INV-1".to_string(),
        monthly_usage_kwh: [300.0; 12],
        usage_pattern: "flat".to_string(),
        utility_company: "tepco".to_string(),
        contract_plan: "standard".to_string(),
        ..Default::default()
    }
}

#[test]
fn full_pipeline_without_battery() {
    let dir = tempfile::tempdir().unwrap();
    write_catalogs(dir.path());
    let engine = Engine::new(Catalogs::load(dir.path()));

    let result = engine.run(&fixture_input());
    assert!(result.error.is_none());

    // Noon output is 0.95 * temperature coefficient, one hour per day, so
    // the year lands in the 290..350 kWh band for a 1 kW array.
    assert!(result.estimated_generation > 290.0);
    assert!(result.estimated_generation < 350.0);
    assert_eq!(
        result.estimated_generation,
        result.monthly_generation.iter().sum::<f64>()
    );
    // The sentinel day is skipped, not treated as a huge reading.
    assert!(result.monthly_generation[5] < 40.0);

    // Flat 300 kWh/month over 24 uniform hours: demand at noon is 300/days/24,
    // always below the noon generation, so self-consumption is exactly
    // 12 months * 300/24 = 150 kWh.
    assert_eq!(result.annual_self_consumption, 150.0);
    // Sell and generation round independently (per-month vs annual), so
    // they agree only to within the accumulated rounding.
    let export_gap = result.annual_sell_electricity - (result.estimated_generation - 150.0);
    assert!(export_gap.abs() <= 2.0, "export gap {export_gap}");

    // Priced at the tiered tepco rate and year-1 FIT.
    assert_eq!(result.buy_price_per_kwh, 27.0);
    assert_eq!(result.sell_price_per_kwh, 24.0);
    assert_eq!(result.annual_self_consumption_savings, (150.0f64 * 27.0).round());
    assert_eq!(
        result.annual_sell_revenue,
        (result.annual_sell_electricity * 24.0).round()
    );
    assert_eq!(
        result.total_economic_effect,
        result.annual_self_consumption_savings + result.annual_sell_revenue
    );

    // Generation only happens at noon.
    for hour in 0..24 {
        if hour == 12 {
            assert!(result.hourly_average_generation[hour] > 0.8);
        } else {
            assert_eq!(result.hourly_average_generation[hour], 0.0);
        }
    }

    // 10-year projection: 4 FIT years at 24.0, then 8.3.
    assert_eq!(result.yearly_breakdown.len(), 10);
    assert_eq!(result.yearly_breakdown[0].sell_price, 24.0);
    assert_eq!(result.yearly_breakdown[3].sell_price, 24.0);
    assert_eq!(result.yearly_breakdown[4].sell_price, 8.3);
    assert_eq!(
        result.yearly_breakdown[9].cumulative_total_effect,
        result.total_10year_effect
    );

    assert!(!result.battery_pattern.has_battery);
}

#[test]
fn battery_raises_self_consumption_and_lowers_export() {
    let dir = tempfile::tempdir().unwrap();
    write_catalogs(dir.path());
    let engine = Engine::new(Catalogs::load(dir.path()));

    let mut input = fixture_input();
    input.battery_model = Some("B-6".to_string());
    let result = engine.run(&input);

    assert!(result.error.is_none());
    assert!(result.battery_pattern.has_battery);
    assert_eq!(result.battery_pattern.battery_capacity, 6.0);

    let without = &result.battery_comparison.without_battery;
    let with = &result.battery_comparison.with_battery;
    assert!(with.annual_self_consumption > without.annual_self_consumption);
    assert!(with.annual_sell_electricity < without.annual_sell_electricity);
    assert!(with.annual_charge_total > 0.0);
    assert!(with.annual_discharge_total > 0.0);
    // Lossless fixture battery: everything charged comes back out.
    assert!((with.annual_charge_total - with.annual_discharge_total).abs() <= 0.2);

    // The headline figures are the battery-adjusted ones (rounded to whole
    // kWh, while the comparison block keeps one decimal).
    assert_eq!(
        result.annual_self_consumption,
        with.annual_self_consumption.round()
    );
    assert_eq!(
        result.annual_sell_electricity,
        with.annual_sell_electricity.round()
    );
}

#[test]
fn unknown_battery_model_degrades_to_no_battery() {
    let dir = tempfile::tempdir().unwrap();
    write_catalogs(dir.path());
    let engine = Engine::new(Catalogs::load(dir.path()));

    let mut input = fixture_input();
    input.battery_model = Some("not-a-battery".to_string());
    let result = engine.run(&input);

    assert!(result.error.is_none());
    assert!(!result.battery_pattern.has_battery);
    assert_eq!(result.annual_self_consumption, 150.0);
}

#[test]
fn unknown_location_degrades_generation_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_catalogs(dir.path());
    let engine = Engine::new(Catalogs::load(dir.path()));

    let mut input = fixture_input();
    input.location = "nowhere (99999)".to_string();
    let result = engine.run(&input);

    assert!(result.error.is_none());
    assert_eq!(result.estimated_generation, 0.0);
    assert_eq!(result.annual_self_consumption, 0.0);
    assert_eq!(result.annual_sell_electricity, 0.0);
    assert_eq!(result.total_economic_effect, 0.0);
}

#[test]
fn malformed_input_yields_canonical_zero_result() {
    let dir = tempfile::tempdir().unwrap();
    write_catalogs(dir.path());
    let engine = Engine::new(Catalogs::load(dir.path()));

    let mut input = fixture_input();
    input.monthly_usage_kwh[0] = f64::NAN;
    let result = engine.run(&input);

    assert!(result.error.is_some());
    assert_eq!(result.estimated_generation, 0.0);
    assert_eq!(result.total_economic_effect, 0.0);
    assert_eq!(result.yearly_breakdown.len(), 10);
}

#[test]
fn runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_catalogs(dir.path());
    let engine = Engine::new(Catalogs::load(dir.path()));

    let mut input = fixture_input();
    input.battery_model = Some("B-6".to_string());
    let first = serde_json::to_string(&engine.run(&input)).unwrap();
    let second = serde_json::to_string(&engine.run(&input)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn input_accepts_string_coded_numbers() {
    let raw = r#"{
        "location": "前橋（44166）",
        "module_model": "M-250",
        "module_count": 4,
        "monthly_usage_kwh": ["300", 280.5, "310.2", 300, 300, 300,
                               300, 300, 300, 300, 300, "300"],
        "usage_pattern": "flat",
        "utility_company": "tepco",
        "contract_plan": "standard"
    }"#;
    let input: SimulationInput = serde_json::from_str(raw).unwrap();
    assert_eq!(input.monthly_usage_kwh[0], 300.0);
    assert_eq!(input.monthly_usage_kwh[1], 280.5);
    assert_eq!(input.monthly_usage_kwh[2], 310.2);
    assert_eq!(input.inverter_count, 1);
}
