//! # Reference Catalogs
//!
//! Read-only reference data shared across simulation requests: irradiance,
//! equipment, and tariffs. All three load once up front; no file is touched
//! inside the hourly loop, and a missing or broken file degrades to empty
//! tables rather than failing the process.

pub mod equipment;
pub mod irradiance;
pub mod tariff;

pub use equipment::EquipmentCatalog;
pub use irradiance::IrradianceCatalog;
pub use tariff::TariffCatalog;

use std::path::Path;

use tracing::info;

/// The full catalog bundle one engine instance works against.
#[derive(Debug, Default)]
pub struct Catalogs {
    pub irradiance: IrradianceCatalog,
    pub equipment: EquipmentCatalog,
    pub tariff: TariffCatalog,
}

impl Catalogs {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load everything from a data directory. Irradiance files live in
    /// `nedo/nedo_solar_data/` below it, the rest at the top level.
    pub fn load(data_dir: &Path) -> Self {
        let irradiance = IrradianceCatalog::load_dir(&data_dir.join("nedo").join("nedo_solar_data"));
        let equipment = EquipmentCatalog::load_dir(data_dir);
        let tariff = TariffCatalog::load_dir(data_dir);
        info!(
            dir = %data_dir.display(),
            irradiance_locations = irradiance.len(),
            "catalogs loaded"
        );
        Self {
            irradiance,
            equipment,
            tariff,
        }
    }
}
