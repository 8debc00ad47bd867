//! # Irradiance Catalog
//!
//! Per-location mean-year solar radiation, one NEDO-format JSON file per
//! location (`hm{id}year.json`). Each file carries 365 daily rows; row
//! indices 4..=27 hold the hourly readings for 00:00-23:00 in 0.01 MJ/m²,
//! index 30 holds the daily total. The value `8888` marks a missing reading.
//!
//! Files are parsed once at load time into fixed-size typed records; lookups
//! after that are allocation-free.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::series::{DAYS_PER_YEAR, HOURS_PER_DAY};

/// Sentinel marking a missing hourly reading in the source data.
pub const MISSING_READING: f64 = 8888.0;

/// Row offset of the 00:00 hourly reading in a NEDO daily row.
const HOURLY_FIELD_OFFSET: usize = 4;
/// Row offset of the daily total.
const DAILY_TOTAL_FIELD: usize = 30;

/// One day of hourly irradiance readings (0.01 MJ/m²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyIrradiance {
    pub hourly: [f64; HOURS_PER_DAY],
    pub daily_total: f64,
}

impl Default for DailyIrradiance {
    fn default() -> Self {
        Self {
            hourly: [0.0; HOURS_PER_DAY],
            daily_total: 0.0,
        }
    }
}

/// A mean-year of daily irradiance records for one location.
#[derive(Debug, Clone, Default)]
pub struct IrradianceYear {
    days: Vec<DailyIrradiance>,
}

impl IrradianceYear {
    /// Build a year directly from daily records (tests and embedding).
    pub fn from_days(days: Vec<DailyIrradiance>) -> Self {
        Self { days }
    }

    /// Hourly reading for a 0-based day-of-year, zero past the data end.
    pub fn reading(&self, day: usize, hour: usize) -> f64 {
        self.days
            .get(day)
            .map(|d| d.hourly[hour])
            .unwrap_or(0.0)
    }

    pub fn daily_total(&self, day: usize) -> f64 {
        self.days.get(day).map(|d| d.daily_total).unwrap_or(0.0)
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

/// Raw file shape: `daily_data` rows of heterogeneous string/number fields.
#[derive(Deserialize)]
struct IrradianceFile {
    daily_data: Vec<Vec<serde_json::Value>>,
}

/// Load-once catalog of mean-year irradiance keyed by location id.
#[derive(Debug, Default)]
pub struct IrradianceCatalog {
    records: HashMap<String, IrradianceYear>,
}

impl IrradianceCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// In-memory catalog for tests and embedding.
    pub fn from_records(records: HashMap<String, IrradianceYear>) -> Self {
        Self { records }
    }

    /// Scan a directory for `hm{id}year.json` files. Unparseable files are
    /// skipped with a warning; an absent directory yields an empty catalog.
    pub fn load_dir(dir: &Path) -> Self {
        let mut records = HashMap::new();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "irradiance directory unavailable");
                return Self::default();
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(id) = name
                .strip_prefix("hm")
                .and_then(|rest| rest.strip_suffix("year.json"))
            else {
                continue;
            };
            match parse_file(&entry.path()) {
                Ok(year) => {
                    debug!(location_id = id, days = year.day_count(), "loaded irradiance file");
                    records.insert(id.to_string(), year);
                }
                Err(err) => warn!(file = %name, %err, "skipping unparseable irradiance file"),
            }
        }
        Self { records }
    }

    /// Look up by the parenthesized id in a human-readable location label.
    pub fn lookup(&self, location_label: &str) -> Option<&IrradianceYear> {
        let id = extract_location_id(location_label)?;
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_file(path: &Path) -> Result<IrradianceYear> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file: IrradianceFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut days = Vec::with_capacity(DAYS_PER_YEAR);
    for row in file.daily_data.iter().take(DAYS_PER_YEAR) {
        let mut day = DailyIrradiance::default();
        for (hour, slot) in day.hourly.iter_mut().enumerate() {
            *slot = field_f64(row, HOURLY_FIELD_OFFSET + hour);
        }
        day.daily_total = field_f64(row, DAILY_TOTAL_FIELD);
        days.push(day);
    }
    Ok(IrradianceYear { days })
}

/// Field values come through as either JSON numbers or strings; anything
/// unreadable counts as zero, matching the degrade-to-zero policy.
fn field_f64(row: &[serde_json::Value], index: usize) -> f64 {
    match row.get(index) {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Extract the numeric location id from a `"name (id)"` label, accepting
/// both full-width `（）` and half-width `()` parentheses.
pub fn extract_location_id(label: &str) -> Option<String> {
    for (open, close) in [('（', '）'), ('(', ')')] {
        if let Some(start) = label.find(open) {
            // Only a close paren after the open one counts; a stray close
            // paren earlier in the label must not match.
            let after = &label[start + open.len_utf8()..];
            if let Some(end) = after.find(close) {
                let inner = &after[..end];
                if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
                    return Some(inner.to_string());
                }
            }
        }
    }
    None
}
