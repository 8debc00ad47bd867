//! # Tariff Catalog
//!
//! Utility-company buy-price plans and usage-pattern diurnal ratios.
//!
//! The company-to-file mapping is an explicit enumeration resolved at load
//! time rather than a string-keyed file dispatch; an unknown company name
//! simply resolves to no plan and the default buy price.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use strum::IntoEnumIterator;
use tracing::warn;

use crate::domain::series::HOURS_PER_DAY;
use crate::error::SimulationError;

/// The utility companies with known plan files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UtilityCompany {
    Tepco,
    Chubu,
    Kepco,
    Chugoku,
    Shikoku,
    Kyushu,
}

impl UtilityCompany {
    fn plan_file(&self) -> &'static str {
        match self {
            UtilityCompany::Tepco => "tepco_plans.json",
            UtilityCompany::Chubu => "chuden_plans.json",
            UtilityCompany::Kepco => "kepco_plans.json",
            UtilityCompany::Chugoku => "chugoku_plans.json",
            UtilityCompany::Shikoku => "shikoku_plans.json",
            UtilityCompany::Kyushu => "kyushu_plans.json",
        }
    }
}

/// One contract plan. Only the usage-rate fields participate in the buy-price
/// lookup; all other plan fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractPlan {
    pub plan_name: String,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub usage_rate_tier2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub usage_rate: Option<f64>,
}

impl ContractPlan {
    /// Buy price for this plan: tiered rate first, flat rate second.
    pub fn buy_price(&self) -> Option<f64> {
        self.usage_rate_tier2.or(self.usage_rate)
    }
}

#[derive(Deserialize, Default)]
struct PlanFile {
    #[serde(default)]
    active_plans: ActivePlans,
}

#[derive(Deserialize, Default)]
struct ActivePlans {
    #[serde(default)]
    plans: Vec<ContractPlan>,
}

/// Load-once tariff catalog: per-company plans plus diurnal usage patterns.
#[derive(Debug, Default)]
pub struct TariffCatalog {
    plans: HashMap<UtilityCompany, Vec<ContractPlan>>,
    patterns: HashMap<String, [f64; HOURS_PER_DAY]>,
}

impl TariffCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// In-memory catalog for tests and embedding.
    pub fn from_parts(
        plans: HashMap<UtilityCompany, Vec<ContractPlan>>,
        patterns: HashMap<String, [f64; HOURS_PER_DAY]>,
    ) -> Self {
        Self { plans, patterns }
    }

    /// Load every known company's plan file plus `usage_patterns.json` from a
    /// directory. Missing files degrade that company or table to empty.
    pub fn load_dir(dir: &Path) -> Self {
        let mut plans = HashMap::new();
        for company in UtilityCompany::iter() {
            match load_json::<PlanFile>(&dir.join(company.plan_file())) {
                Ok(file) => {
                    plans.insert(company, file.active_plans.plans);
                }
                Err(err) => warn!(%company, %err, "plan file unavailable"),
            }
        }

        let patterns = match load_json::<HashMap<String, Vec<f64>>>(&dir.join("usage_patterns.json")) {
            Ok(raw) => raw
                .into_iter()
                .filter_map(|(name, ratios)| {
                    let ratios: [f64; HOURS_PER_DAY] = match ratios.try_into() {
                        Ok(r) => r,
                        Err(_) => {
                            warn!(pattern = %name, "usage pattern is not 24 ratios, skipping");
                            return None;
                        }
                    };
                    Some((name, ratios))
                })
                .collect(),
            Err(err) => {
                warn!(%err, "usage pattern file unavailable");
                HashMap::new()
            }
        };

        Self { plans, patterns }
    }

    /// Buy price (per kWh) for a company + plan pair, with the configured
    /// default when either the company, the plan, or its rates are unknown.
    pub fn buy_price(&self, company: &str, plan_name: &str, default: f64) -> f64 {
        use std::str::FromStr;
        let Ok(company) = UtilityCompany::from_str(company) else {
            return default;
        };
        self.plans
            .get(&company)
            .and_then(|plans| plans.iter().find(|p| p.plan_name == plan_name))
            .and_then(ContractPlan::buy_price)
            .unwrap_or(default)
    }

    /// 24 diurnal ratios for a usage-pattern name.
    pub fn usage_ratios(&self, pattern: &str) -> Result<&[f64; HOURS_PER_DAY], SimulationError> {
        self.patterns
            .get(pattern)
            .ok_or_else(|| SimulationError::UnknownUsagePattern(pattern.to_string()))
    }
}

/// Rates may be stored as numbers or strings.
fn lenient_rate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    Ok(Option::<Raw>::deserialize(deserializer)
        .unwrap_or(None)
        .and_then(|raw| match raw {
            Raw::Number(v) => Some(v),
            Raw::Text(s) => s.trim().parse().ok(),
        }))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
