//! # Launch Parameters
//!
//! `LaunchRequest` is the loosely-checked shape a caller sends (e8s as `u64`).
//! `LaunchParameters` is the only thing the engine accepts, and it can only
//! be built through validation.
//!
//! ## Invariants
//!
//! | Rule | Error |
//! |------|-------|
//! | `primary_max_supply > 0` | InvalidAmount |
//! | `tge_allocation > 0` | InvalidAmount |
//! | `initial_secondary_burn > 0` | InvalidAmount |
//! | `initial_reward_per_burn_unit > 0` | InvalidAmount |
//! | `1 <= halving_step_percent <= 99` | InvalidAmount |
//! | `tge_allocation < primary_max_supply` | InvalidAmount |
//! | first decay step fits in 128 bits | MultiplicationOverflow |

use crate::amount::Amount;
use crate::constants::{MAX_HALVING_STEP_PERCENT, MIN_HALVING_STEP_PERCENT};
use crate::error::{Result, TokenomicsError, DEFAULT_INVALID_AMOUNT_ERROR};
use crate::halving::next_reward_rate;
use serde::{Deserialize, Serialize};

/// Launch parameters as received from a caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Hard cap on primary supply, e8s
    pub primary_max_supply: u64,
    /// Primary minted at the token generation event, e8s
    pub tge_allocation: u64,
    /// Secondary burned per epoch (the burn unit), e8s
    pub initial_secondary_burn: u64,
    /// Primary minted per burn unit in the first epoch, e8s
    pub initial_reward_per_burn_unit: u64,
    /// Percentage cut applied to the reward rate at each epoch boundary
    pub halving_step_percent: u8,
}

impl LaunchRequest {
    /// Validate into engine-ready parameters
    pub fn validate(&self) -> Result<LaunchParameters> {
        LaunchParameters::new(
            Amount::from(self.primary_max_supply),
            Amount::from(self.tge_allocation),
            Amount::from(self.initial_secondary_burn),
            Amount::from(self.initial_reward_per_burn_unit),
            self.halving_step_percent,
        )
    }
}

/// Validated, immutable launch parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LaunchParameters {
    primary_max_supply: Amount,
    tge_allocation: Amount,
    burn_unit: Amount,
    initial_reward_per_burn_unit: Amount,
    halving_step_percent: u8,
}

impl LaunchParameters {
    pub fn new(
        primary_max_supply: Amount,
        tge_allocation: Amount,
        burn_unit: Amount,
        initial_reward_per_burn_unit: Amount,
        halving_step_percent: u8,
    ) -> Result<Self> {
        require_positive("primary_max_supply", primary_max_supply)?;
        require_positive("tge_allocation", tge_allocation)?;
        require_positive("initial_secondary_burn", burn_unit)?;
        require_positive("initial_reward_per_burn_unit", initial_reward_per_burn_unit)?;

        if !(MIN_HALVING_STEP_PERCENT..=MAX_HALVING_STEP_PERCENT).contains(&halving_step_percent) {
            return Err(TokenomicsError::invalid_amount(
                "halving step out of range",
                format!(
                    "halving_step_percent: {} not in [{}, {}]",
                    halving_step_percent, MIN_HALVING_STEP_PERCENT, MAX_HALVING_STEP_PERCENT
                ),
            ));
        }

        if tge_allocation >= primary_max_supply {
            return Err(TokenomicsError::invalid_amount(
                "TGE allocation must be below max supply",
                format!(
                    "tge_allocation: {} with primary_max_supply: {}",
                    tge_allocation.e8s(),
                    primary_max_supply.e8s()
                ),
            ));
        }

        next_reward_rate(initial_reward_per_burn_unit, halving_step_percent)?;

        Ok(Self {
            primary_max_supply,
            tge_allocation,
            burn_unit,
            initial_reward_per_burn_unit,
            halving_step_percent,
        })
    }

    pub fn primary_max_supply(&self) -> Amount {
        self.primary_max_supply
    }

    pub fn tge_allocation(&self) -> Amount {
        self.tge_allocation
    }

    /// Secondary burned per epoch (`initial_secondary_burn`)
    pub fn burn_unit(&self) -> Amount {
        self.burn_unit
    }

    pub fn initial_reward_per_burn_unit(&self) -> Amount {
        self.initial_reward_per_burn_unit
    }

    pub fn halving_step_percent(&self) -> u8 {
        self.halving_step_percent
    }

    /// Primary left for the curve once the TGE allocation is minted
    pub fn mintable_headroom(&self) -> Result<Amount> {
        self.primary_max_supply
            .try_sub(self.tge_allocation, "mintable headroom")
    }
}

impl TryFrom<LaunchRequest> for LaunchParameters {
    type Error = TokenomicsError;

    fn try_from(request: LaunchRequest) -> Result<Self> {
        request.validate()
    }
}

impl TryFrom<&LaunchRequest> for LaunchParameters {
    type Error = TokenomicsError;

    fn try_from(request: &LaunchRequest) -> Result<Self> {
        request.validate()
    }
}

fn require_positive(field: &str, value: Amount) -> Result<()> {
    if value.is_zero() {
        return Err(TokenomicsError::invalid_amount(
            DEFAULT_INVALID_AMOUNT_ERROR,
            format!("{} must be greater than zero", field),
        ));
    }
    Ok(())
}
