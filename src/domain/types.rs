//! Core domain types: the simulation request and equipment nameplate records.

use serde::{Deserialize, Deserializer, Serialize};

/// Mounting face of the PV array; one axis of the installation-coefficient
/// lookup.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InstallationFace {
    North,
    East,
    #[default]
    South,
    West,
}

/// One simulation request. Immutable for the duration of a run.
///
/// Usage figures arrive from a form layer and may be strings or missing;
/// they are coerced to zero rather than rejected, matching the documented
/// malformed-input policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationInput {
    /// Human-readable location label, e.g. `"Kitaibaraki (40046)"`. The
    /// parenthesized numeric suffix is the irradiance catalog key.
    pub location: String,
    pub module_model: String,
    pub module_count: u32,
    pub inverter_model: String,
    pub inverter_count: u32,
    pub tilt_angle_deg: u32,
    pub installation_face: InstallationFace,
    /// Monthly electricity usage totals, January through December (kWh).
    #[serde(deserialize_with = "lenient_kwh_12")]
    pub monthly_usage_kwh: [f64; 12],
    pub usage_pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_model: Option<String>,
    pub utility_company: String,
    pub contract_plan: String,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            location: String::new(),
            module_model: String::new(),
            module_count: 0,
            inverter_model: String::new(),
            inverter_count: 1,
            tilt_angle_deg: 30,
            installation_face: InstallationFace::South,
            monthly_usage_kwh: [0.0; 12],
            usage_pattern: String::new(),
            battery_model: None,
            utility_company: String::new(),
            contract_plan: String::new(),
        }
    }
}

/// PV module nameplate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub model: String,
    /// Nominal power per unit in watts.
    #[serde(deserialize_with = "lenient_f64")]
    pub nominal_power: f64,
}

/// Inverter nameplate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InverterSpec {
    pub model_name: String,
    /// Rated conversion efficiency, 0..=1.
    #[serde(deserialize_with = "lenient_f64")]
    pub efficiency: f64,
}

/// Battery nameplate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatterySpec {
    pub model_name: String,
    /// Display capacity (kWh), reporting only.
    #[serde(deserialize_with = "lenient_f64")]
    pub capacity_kwh: f64,
    /// Effective capacity (kWh) bounding the state of charge.
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub effective_capacity_kwh: Option<f64>,
    /// Rated charge/discharge power (kW).
    #[serde(deserialize_with = "lenient_f64")]
    pub rated_output_kw: f64,
    /// Round-trip efficiency as a percentage, e.g. 92.6.
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub charge_discharge_efficiency_percent: Option<f64>,
}

impl BatterySpec {
    /// Effective SOC bound, falling back to the display capacity.
    pub fn effective_capacity(&self) -> f64 {
        self.effective_capacity_kwh.unwrap_or(self.capacity_kwh)
    }

    /// Round-trip efficiency as a fraction, default 92.6 %.
    pub fn efficiency(&self) -> f64 {
        self.charge_discharge_efficiency_percent.unwrap_or(92.6) / 100.0
    }
}

/// Accepts a number, a numeric string, or null; anything else coerces to 0.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Null,
}

impl LenientNumber {
    fn to_f64(&self) -> f64 {
        match self {
            LenientNumber::Number(v) => *v,
            LenientNumber::Text(s) => s.trim().parse().unwrap_or(0.0),
            LenientNumber::Null => 0.0,
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(LenientNumber::deserialize(deserializer)
        .map(|n| n.to_f64())
        .unwrap_or(0.0))
}

fn lenient_f64_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<LenientNumber>::deserialize(deserializer)
        .unwrap_or(None)
        .map(|n| n.to_f64()))
}

fn lenient_kwh_12<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 12], D::Error> {
    let values = Vec::<LenientNumber>::deserialize(deserializer).unwrap_or_default();
    let mut out = [0.0; 12];
    for (slot, value) in out.iter_mut().zip(values.iter()) {
        *slot = value.to_f64();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_default_is_south() {
        assert_eq!(InstallationFace::default(), InstallationFace::South);
    }

    #[test]
    fn test_input_coerces_string_usage() {
        let input: SimulationInput = serde_json::from_str(
            r#"{
                "location": "Kitaibaraki (40046)",
                "module_model": "M-300",
                "module_count": 10,
                "monthly_usage_kwh": ["300", 250, "not a number", null],
                "usage_pattern": "daytime",
                "utility_company": "tepco",
                "contract_plan": "standard"
            }"#,
        )
        .unwrap();
        assert_eq!(input.monthly_usage_kwh[0], 300.0);
        assert_eq!(input.monthly_usage_kwh[1], 250.0);
        assert_eq!(input.monthly_usage_kwh[2], 0.0);
        assert_eq!(input.monthly_usage_kwh[3], 0.0);
        assert_eq!(input.monthly_usage_kwh[11], 0.0);
        assert_eq!(input.inverter_count, 1);
        assert_eq!(input.tilt_angle_deg, 30);
    }

    #[test]
    fn test_battery_spec_fallbacks() {
        let spec: BatterySpec = serde_json::from_str(
            r#"{"model_name": "B-5", "capacity_kwh": 5.0, "rated_output_kw": 2.0}"#,
        )
        .unwrap();
        assert_eq!(spec.effective_capacity(), 5.0);
        assert!((spec.efficiency() - 0.926).abs() < 1e-9);
    }
}
