//! # Launchpad Economics - Burn-to-Mint Tokenomics
//!
//! Deterministic simulation of a dual-token launch: holders burn a fixed unit
//! of the secondary token per epoch and receive primary tokens at a reward
//! rate that decays by a configurable percentage each epoch, until the
//! primary supply cap is reached.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────────┐   ┌──────────────────┐   ┌──────────────┐   ┌───────────┐
//! │ LaunchRequest │──▶│ LaunchParameters │──▶│ BondingCurve │──▶│ GraphData │
//! │  (untrusted)  │   │   (validated)    │   │  (epochs)    │   │ (series)  │
//! └───────────────┘   └──────────────────┘   └──────────────┘   └───────────┘
//!                                                   ▲
//!                                          HalvingSchedule
//! ```
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | `amount` | e8s token quantities and 8-decimal USD values, checked arithmetic |
//! | `params` | Launch parameter validation |
//! | `halving` | Reward-rate decay schedule |
//! | `curve` | Epoch-by-epoch burn/mint simulation |
//! | `graph` | Chart-ready series |
//! | `pricing` | Price quotes with a staleness window |
//! | `launchpad` | Token creation and launch records |
//! | `config` | TOML configuration |
//! | `error` | Error taxonomy |

pub mod amount;
pub mod config;
pub mod curve;
pub mod error;
pub mod graph;
pub mod halving;
pub mod launchpad;
pub mod params;
pub mod pricing;

// Re-exports
pub use amount::{Amount, UsdValue, DECIMALS, E8S, USD_SCALE};
pub use config::{EconomicsConfig, LaunchConfig, PricingConfig};
pub use curve::{simulate, BondingCurve, CurveProjection, CurveSummary, Epoch, EpochKind, Termination};
pub use error::{Result, TokenomicsError};
pub use graph::{preview, preview_tokenomics, GraphData, TokenomicsPreview};
pub use halving::{next_reward_rate, HalvingSchedule, RewardTier};
pub use launchpad::{CreateTokenRequest, Launchpad, TokenCreated, TokenMetadata, TokenRecord};
pub use params::{LaunchParameters, LaunchRequest};
pub use pricing::{PriceCache, PriceQuote};

/// Launch economics constants
pub mod constants {
    use crate::amount::UsdValue;

    /// Smallest accepted halving step, percent
    pub const MIN_HALVING_STEP_PERCENT: u8 = 1;

    /// Largest accepted halving step, percent
    pub const MAX_HALVING_STEP_PERCENT: u8 = 99;

    /// USD price of one secondary token used for cost projections: $0.005
    pub const SECONDARY_BURN_USD_PRICE: UsdValue = UsdValue::from_raw(500_000);

    /// Token creation fee: 2 ICP
    pub const CREATION_FEE_E8S: u64 = 200_000_000;

    /// Token the creation fee is paid in
    pub const CREATION_FEE_TOKEN: &str = "ICP";

    /// Price quotes older than this are refetched
    pub const PRICE_STALENESS_SECS: i64 = 300;

    /// Label of the synthetic first row of every graph series
    pub const TGE_LABEL: &str = "TGE";

    /// Halving steps compared by a default sweep
    pub const DEFAULT_HALVING_SWEEP: [u8; 14] =
        [25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90];
}

pub use constants::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_price() {
        assert_eq!(SECONDARY_BURN_USD_PRICE.to_string(), "0.00500000");
    }

    #[test]
    fn test_default_sweep_within_step_range() {
        assert!(DEFAULT_HALVING_SWEEP
            .iter()
            .all(|s| (MIN_HALVING_STEP_PERCENT..=MAX_HALVING_STEP_PERCENT).contains(s)));
    }
}
