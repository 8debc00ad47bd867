//! # Equipment Catalog
//!
//! Module/inverter/battery nameplate records and the installation-coefficient
//! table, loaded once from JSON. Lookups never hard-fail: an unmatched model
//! degrades to a zero or default value so the simulation always completes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::domain::types::{BatterySpec, InstallationFace, InverterSpec, ModuleSpec};

/// Inverter efficiency assumed when the model is not in the catalog.
pub const DEFAULT_INVERTER_EFFICIENCY: f64 = 0.95;
/// Derating factor for unknown (face, tilt) combinations.
pub const DEFAULT_INSTALLATION_COEFFICIENT: f64 = 1.0;

#[derive(Deserialize, Default)]
struct ModuleFile {
    #[serde(default)]
    modules: Vec<ModuleSpec>,
}

#[derive(Deserialize, Default)]
struct InverterFile {
    #[serde(default)]
    inverters: Vec<InverterSpec>,
}

#[derive(Deserialize, Default)]
struct BatteryFile {
    #[serde(default)]
    batteries: Vec<BatterySpec>,
}

#[derive(Deserialize, Default)]
struct CoefficientFile {
    /// face name -> tilt-angle string -> coefficient
    #[serde(default)]
    coefficients: HashMap<String, HashMap<String, f64>>,
}

/// Load-once equipment catalog.
#[derive(Debug, Default)]
pub struct EquipmentCatalog {
    modules: Vec<ModuleSpec>,
    inverters: Vec<InverterSpec>,
    batteries: Vec<BatterySpec>,
    /// Resolved at load time to typed keys; unknown face names are dropped.
    coefficients: HashMap<(InstallationFace, u32), f64>,
}

impl EquipmentCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// In-memory catalog for tests and embedding.
    pub fn from_parts(
        modules: Vec<ModuleSpec>,
        inverters: Vec<InverterSpec>,
        batteries: Vec<BatterySpec>,
        coefficients: HashMap<(InstallationFace, u32), f64>,
    ) -> Self {
        Self {
            modules,
            inverters,
            batteries,
            coefficients,
        }
    }

    /// Load `module_data.json`, `inverter_data.json`, `battery_data.json` and
    /// `installation_coefficients.json` from a directory. Each file is
    /// independent; a missing or broken file degrades that table to empty.
    pub fn load_dir(dir: &Path) -> Self {
        let modules = load_json::<ModuleFile>(&dir.join("module_data.json"))
            .map(|f| f.modules)
            .unwrap_or_default();
        let inverters = load_json::<InverterFile>(&dir.join("inverter_data.json"))
            .map(|f| f.inverters)
            .unwrap_or_default();
        let batteries = load_json::<BatteryFile>(&dir.join("battery_data.json"))
            .map(|f| f.batteries)
            .unwrap_or_default();
        let raw_coefficients = load_json::<CoefficientFile>(&dir.join("installation_coefficients.json"))
            .map(|f| f.coefficients)
            .unwrap_or_default();

        let mut coefficients = HashMap::new();
        for (face_name, tilts) in &raw_coefficients {
            let Ok(face) = InstallationFace::from_str(face_name) else {
                warn!(face = %face_name, "unknown installation face in coefficient table");
                continue;
            };
            for (tilt, coefficient) in tilts {
                match tilt.parse::<u32>() {
                    Ok(tilt) => {
                        coefficients.insert((face, tilt), *coefficient);
                    }
                    Err(_) => warn!(%tilt, "non-numeric tilt key in coefficient table"),
                }
            }
        }

        Self {
            modules,
            inverters,
            batteries,
            coefficients,
        }
    }

    /// Nominal power (W) per module unit; 0 when the model is unmatched.
    pub fn module_power_w(&self, model: &str) -> f64 {
        self.modules
            .iter()
            .find(|m| m.model == model)
            .map(|m| m.nominal_power)
            .unwrap_or(0.0)
    }

    /// Rated inverter efficiency; 0.95 when the model is unmatched.
    pub fn inverter_efficiency(&self, model: &str) -> f64 {
        self.inverters
            .iter()
            .find(|i| i.model_name == model)
            .map(|i| i.efficiency)
            .unwrap_or(DEFAULT_INVERTER_EFFICIENCY)
    }

    pub fn battery(&self, model: &str) -> Option<&BatterySpec> {
        self.batteries.iter().find(|b| b.model_name == model)
    }

    /// Derating factor for a (face, tilt) pair; 1.0 for unknown combinations.
    pub fn installation_coefficient(&self, face: InstallationFace, tilt_deg: u32) -> f64 {
        self.coefficients
            .get(&(face, tilt_deg))
            .copied()
            .unwrap_or(DEFAULT_INSTALLATION_COEFFICIENT)
    }
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> EquipmentCatalog {
        let mut coefficients = HashMap::new();
        coefficients.insert((InstallationFace::South, 30), 1.0);
        coefficients.insert((InstallationFace::East, 30), 0.85);
        EquipmentCatalog::from_parts(
            vec![ModuleSpec {
                model: "M-300".to_string(),
                nominal_power: 300.0,
            }],
            vec![InverterSpec {
                model_name: "INV-55".to_string(),
                efficiency: 0.96,
            }],
            vec![BatterySpec {
                model_name: "B-10".to_string(),
                capacity_kwh: 10.0,
                effective_capacity_kwh: Some(9.0),
                rated_output_kw: 3.0,
                charge_discharge_efficiency_percent: Some(90.0),
            }],
            coefficients,
        )
    }

    #[test]
    fn test_module_lookup_defaults_to_zero() {
        let catalog = catalog();
        assert_eq!(catalog.module_power_w("M-300"), 300.0);
        assert_eq!(catalog.module_power_w("unknown"), 0.0);
    }

    #[test]
    fn test_inverter_lookup_defaults() {
        let catalog = catalog();
        assert_eq!(catalog.inverter_efficiency("INV-55"), 0.96);
        assert_eq!(catalog.inverter_efficiency("unknown"), DEFAULT_INVERTER_EFFICIENCY);
    }

    #[test]
    fn test_coefficient_fallback() {
        let catalog = catalog();
        assert_eq!(catalog.installation_coefficient(InstallationFace::East, 30), 0.85);
        assert_eq!(
            catalog.installation_coefficient(InstallationFace::North, 45),
            DEFAULT_INSTALLATION_COEFFICIENT
        );
    }

    #[test]
    fn test_battery_lookup() {
        let catalog = catalog();
        let spec = catalog.battery("B-10").unwrap();
        assert_eq!(spec.effective_capacity(), 9.0);
        assert!((spec.efficiency() - 0.9).abs() < 1e-9);
        assert!(catalog.battery("missing").is_none());
    }
}
