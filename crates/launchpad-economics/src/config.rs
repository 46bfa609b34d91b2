//! Economics configuration types

use crate::amount::UsdValue;
use crate::constants::*;
use crate::error::{Result, TokenomicsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete economics configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Pricing inputs for USD projections
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Token launch rules
    #[serde(default)]
    pub launch: LaunchConfig,
}

impl EconomicsConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TokenomicsError::invalid_input(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TokenomicsError::invalid_input(format!("invalid config: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TokenomicsError::invalid_input(format!("cannot encode config: {}", e)))
    }
}

/// Pricing settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// USD price of one secondary token
    #[serde(default = "default_secondary_usd_price")]
    pub secondary_usd_price: UsdValue,

    /// Seconds before a cached price quote is considered stale
    #[serde(default = "default_price_staleness_secs")]
    pub price_staleness_secs: i64,
}

fn default_secondary_usd_price() -> UsdValue {
    SECONDARY_BURN_USD_PRICE
}

fn default_price_staleness_secs() -> i64 {
    PRICE_STALENESS_SECS
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            secondary_usd_price: default_secondary_usd_price(),
            price_staleness_secs: default_price_staleness_secs(),
        }
    }
}

/// Launch settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Fee a creator must pay, e8s of the fee token
    #[serde(default = "default_creation_fee_e8s")]
    pub creation_fee_e8s: u64,

    /// Symbol of the fee token
    #[serde(default = "default_fee_token")]
    pub fee_token: String,

    /// Maximum token name length
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Maximum token symbol length
    #[serde(default = "default_max_symbol_len")]
    pub max_symbol_len: usize,
}

fn default_creation_fee_e8s() -> u64 {
    CREATION_FEE_E8S
}

fn default_fee_token() -> String {
    CREATION_FEE_TOKEN.to_string()
}

fn default_max_name_len() -> usize {
    32
}

fn default_max_symbol_len() -> usize {
    8
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            creation_fee_e8s: default_creation_fee_e8s(),
            fee_token: default_fee_token(),
            max_name_len: default_max_name_len(),
            max_symbol_len: default_max_symbol_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EconomicsConfig::default();
        assert_eq!(config.pricing.secondary_usd_price, UsdValue::from_raw(500_000));
        assert_eq!(config.pricing.price_staleness_secs, 300);
        assert_eq!(config.launch.creation_fee_e8s, 200_000_000);
        assert_eq!(config.launch.fee_token, "ICP");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EconomicsConfig::from_toml(
            r#"
            [pricing]
            secondary_usd_price = "0.01"
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.secondary_usd_price, UsdValue::from_cents(1));
        assert_eq!(config.pricing.price_staleness_secs, 300);
        assert_eq!(config.launch, LaunchConfig::default());
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let mut config = EconomicsConfig::default();
        config.launch.creation_fee_e8s = 50_000_000;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml().unwrap().as_bytes()).unwrap();

        let loaded = EconomicsConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bad_toml() {
        let err = EconomicsConfig::from_toml("pricing = 3").unwrap_err();
        assert!(matches!(err, TokenomicsError::InvalidInput { .. }));
    }
}
