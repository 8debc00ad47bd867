use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub economics: EconomicsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root of the reference catalogs (irradiance, equipment, tariffs).
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Buy price used when the requested plan is not in the tariff catalog.
    pub default_buy_price: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                dir: PathBuf::from("data"),
            },
            economics: EconomicsConfig {
                default_buy_price: crate::simulation::economics::DEFAULT_BUY_PRICE,
            },
        }
    }
}

impl Config {
    /// Layered load: built-in defaults, then `config/default.toml` if
    /// present, then `PVSIM__`-prefixed environment variables.
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("PVSIM__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_extract_without_file() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load().unwrap();
            assert_eq!(config.data.dir, PathBuf::from("data"));
            assert_eq!(config.economics.default_buy_price, 30.0);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PVSIM__DATA__DIR", "/srv/catalogs");
            jail.set_env("PVSIM__ECONOMICS__DEFAULT_BUY_PRICE", "27.5");
            let config = Config::load().unwrap();
            assert_eq!(config.data.dir, PathBuf::from("/srv/catalogs"));
            assert_eq!(config.economics.default_buy_price, 27.5);
            Ok(())
        });
    }
}
