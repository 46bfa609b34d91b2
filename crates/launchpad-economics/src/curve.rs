//! # Bonding Curve Engine
//!
//! Drives the epoch-by-epoch mint simulation for one set of launch
//! parameters. Burning one burn unit of secondary token during epoch `n`
//! mints `rate(n)` primary:
//!
//! ```text
//! minted(n)  = burned(n) * rate(n) / burn_unit
//! cost(n)    = burn_unit * secondary_usd_price / rate(n)     (USD per primary token)
//! total_usd += cost(n) * minted(n)
//! ```
//!
//! ## Termination
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Cumulative mint reaches `max_supply - tge` | last epoch is clamped to the remainder |
//! | Halving schedule reaches a zero rate first | one settlement epoch at the last positive rate mints the remainder |
//!
//! Either way `tge_allocation + sum(minted) == primary_max_supply`.
//!
//! A partial epoch burns `ceil(minted * burn_unit / rate)`, so every epoch
//! that mints burns at least 1 e8s of secondary.
//!
//! Every call is pure: the engine owns its epoch buffer until it returns and
//! shares nothing between calls. Any arithmetic failure aborts the whole
//! simulation; no partial projection is ever returned.

use crate::amount::{Amount, UsdValue};
use crate::constants::SECONDARY_BURN_USD_PRICE;
use crate::error::{Result, TokenomicsError};
use crate::halving::HalvingSchedule;
use crate::params::LaunchParameters;
use serde::{Deserialize, Serialize};

/// How an epoch came to be
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpochKind {
    /// Regular epoch driven by a halving tier
    Halving,
    /// Final epoch minting whatever the exhausted schedule left over
    Settlement,
}

/// Why the simulation stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Halving epochs minted the full headroom
    MaxSupplyReached,
    /// Reward rate decayed to zero; a settlement epoch closed the curve
    ScheduleExhausted,
}

/// One completed epoch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    /// Zero-based epoch index
    pub index: u32,
    /// Halving or settlement
    pub kind: EpochKind,
    /// Secondary burned during this epoch
    pub secondary_burned: Amount,
    /// Secondary burned since launch
    pub secondary_burned_cumulative: Amount,
    /// Primary minted during this epoch
    pub primary_minted_this_epoch: Amount,
    /// Primary minted by the curve since launch (TGE excluded)
    pub primary_minted_cumulative: Amount,
    /// Primary minted per burn unit
    pub reward_rate: Amount,
    /// Marginal USD cost of one primary token
    pub usd_cost_per_token: UsdValue,
    /// USD spent on burns since launch
    pub usd_cost_cumulative: UsdValue,
}

impl Epoch {
    /// Chart label, one-based
    pub fn label(&self) -> String {
        format!("Epoch {}", self.index + 1)
    }
}

/// Terminal summary of a simulation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveSummary {
    /// All epochs, settlement included
    pub epoch_count: u32,
    /// Epochs driven by a halving tier
    pub halving_epochs: u32,
    /// Primary minted at TGE
    pub tge_allocation: Amount,
    /// Primary minted by the curve
    pub total_primary_minted: Amount,
    /// TGE plus curve mints
    pub total_supply: Amount,
    /// Secondary burned across all epochs
    pub total_secondary_burned: Amount,
    /// USD spent across all epochs
    pub total_usd_cost: UsdValue,
    /// Reward rate of the last epoch
    pub final_reward_rate: Amount,
    /// Stop condition
    pub termination: Termination,
}

/// Output of one simulation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurveProjection {
    /// Parameters the simulation ran with
    pub params: LaunchParameters,
    /// Secondary token price used for USD costs
    pub secondary_usd_price: UsdValue,
    /// Epochs in strictly increasing index order
    pub epochs: Vec<Epoch>,
    /// Terminal summary
    pub summary: CurveSummary,
}

impl CurveProjection {
    /// Reward rate the engine applied at a cumulative secondary burn level.
    ///
    /// Unlike `HalvingSchedule::rate_at`, burn levels inside the settlement
    /// epoch report the settlement rate. Zero once the curve is closed.
    pub fn rate_at(&self, secondary_burned_cumulative: Amount) -> Amount {
        let idx = self
            .epochs
            .partition_point(|e| e.secondary_burned_cumulative <= secondary_burned_cumulative);
        self.epochs
            .get(idx)
            .map(|e| e.reward_rate)
            .unwrap_or(Amount::ZERO)
    }
}

/// Running totals while the curve advances
#[derive(Clone, Copy, Debug, Default)]
struct CurveLedger {
    burned: Amount,
    minted: Amount,
    usd_cost: UsdValue,
}

/// Bonding curve simulator
#[derive(Clone, Debug)]
pub struct BondingCurve {
    params: LaunchParameters,
    secondary_usd_price: UsdValue,
}

impl BondingCurve {
    /// Engine priced at the fixed secondary burn price ($0.005)
    pub fn new(params: LaunchParameters) -> Self {
        Self {
            params,
            secondary_usd_price: SECONDARY_BURN_USD_PRICE,
        }
    }

    /// Override the USD price of one secondary token
    pub fn with_secondary_price(mut self, price: UsdValue) -> Self {
        self.secondary_usd_price = price;
        self
    }

    pub fn params(&self) -> &LaunchParameters {
        &self.params
    }

    pub fn secondary_usd_price(&self) -> UsdValue {
        self.secondary_usd_price
    }

    /// USD cost of one primary token while `reward_rate` applies
    pub fn marginal_cost(&self, reward_rate: Amount) -> Result<UsdValue> {
        self.secondary_usd_price
            .mul_div(self.params.burn_unit(), reward_rate, "marginal cost per token")
    }

    /// Run the full simulation
    pub fn simulate(&self) -> Result<CurveProjection> {
        let headroom = self.params.mintable_headroom()?;
        let burn_unit = self.params.burn_unit();
        let mut schedule = HalvingSchedule::from_params(&self.params)?;
        let mut ledger = CurveLedger::default();
        let mut epochs = Vec::new();
        let mut last_rate = None;

        while ledger.minted < headroom {
            let tier = match schedule.next_tier()? {
                Some(tier) => tier,
                None => break,
            };

            let remaining = headroom.try_sub(ledger.minted, "remaining headroom")?;
            let potential = burn_unit.mul_div(tier.reward_rate, burn_unit, "epoch mint")?;

            let (minted, burned) = if potential > remaining {
                let burned = remaining.mul_div_ceil(burn_unit, tier.reward_rate, "clamped epoch burn")?;
                (remaining, burned)
            } else {
                (potential, burn_unit)
            };

            epochs.push(self.record(
                &mut ledger,
                tier.index,
                EpochKind::Halving,
                tier.reward_rate,
                minted,
                burned,
            )?);
            last_rate = Some(tier.reward_rate);
        }

        let halving_epochs = epochs.len() as u32;

        let termination = if ledger.minted < headroom {
            // Initial reward is validated positive, so at least one tier ran
            let rate = last_rate.ok_or_else(|| TokenomicsError::DivisionFailed {
                operation: "settlement epoch".to_string(),
                details: "no positive reward rate to settle at".to_string(),
            })?;
            let remaining = headroom.try_sub(ledger.minted, "settlement remainder")?;
            let burned = remaining.mul_div_ceil(burn_unit, rate, "settlement burn")?;

            epochs.push(self.record(
                &mut ledger,
                halving_epochs,
                EpochKind::Settlement,
                rate,
                remaining,
                burned,
            )?);
            Termination::ScheduleExhausted
        } else {
            Termination::MaxSupplyReached
        };

        let summary = CurveSummary {
            epoch_count: epochs.len() as u32,
            halving_epochs,
            tge_allocation: self.params.tge_allocation(),
            total_primary_minted: ledger.minted,
            total_supply: self
                .params
                .tge_allocation()
                .try_add(ledger.minted, "total supply")?,
            total_secondary_burned: ledger.burned,
            total_usd_cost: ledger.usd_cost,
            final_reward_rate: epochs
                .last()
                .map(|e| e.reward_rate)
                .unwrap_or(Amount::ZERO),
            termination,
        };

        tracing::debug!(
            epochs = summary.epoch_count,
            halving_epochs = summary.halving_epochs,
            termination = ?summary.termination,
            "Bonding curve simulated"
        );

        Ok(CurveProjection {
            params: self.params,
            secondary_usd_price: self.secondary_usd_price,
            epochs,
            summary,
        })
    }

    /// Close one epoch: advance the ledger and build its record
    fn record(
        &self,
        ledger: &mut CurveLedger,
        index: u32,
        kind: EpochKind,
        reward_rate: Amount,
        minted: Amount,
        burned: Amount,
    ) -> Result<Epoch> {
        let usd_cost_per_token = self.marginal_cost(reward_rate)?;
        let epoch_cost = usd_cost_per_token.times_tokens(minted, "epoch usd cost")?;

        ledger.burned = ledger
            .burned
            .try_add(burned, "secondary_burned_cumulative")?;
        ledger.minted = ledger
            .minted
            .try_add(minted, "primary_minted_cumulative")?;
        ledger.usd_cost = ledger
            .usd_cost
            .try_add(epoch_cost, "usd_cost_cumulative")?;

        Ok(Epoch {
            index,
            kind,
            secondary_burned: burned,
            secondary_burned_cumulative: ledger.burned,
            primary_minted_this_epoch: minted,
            primary_minted_cumulative: ledger.minted,
            reward_rate,
            usd_cost_per_token,
            usd_cost_cumulative: ledger.usd_cost,
        })
    }
}

/// Convenience wrapper: simulate at the default secondary price
pub fn simulate(params: LaunchParameters) -> Result<CurveProjection> {
    BondingCurve::new(params).simulate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max: u64, tge: u64, burn: u64, reward: u64, step: u8) -> LaunchParameters {
        LaunchParameters::new(
            Amount::from_tokens(max),
            Amount::from_tokens(tge),
            Amount::from_tokens(burn),
            Amount::from_tokens(reward),
            step,
        )
        .unwrap()
    }

    #[test]
    fn test_supply_exhausted_before_schedule() {
        let projection = simulate(params(10_000, 1_000, 1_000_000, 5_000, 50)).unwrap();
        let epochs = &projection.epochs;

        assert_eq!(epochs.len(), 4);
        assert_eq!(epochs[0].primary_minted_this_epoch, Amount::from_tokens(5_000));
        assert_eq!(epochs[1].primary_minted_this_epoch, Amount::from_tokens(2_500));
        assert_eq!(epochs[2].primary_minted_this_epoch, Amount::from_tokens(1_250));

        // Clamped final epoch: 250 tokens at 625 per unit burns 0.4 units
        assert_eq!(epochs[3].primary_minted_this_epoch, Amount::from_tokens(250));
        assert_eq!(epochs[3].secondary_burned, Amount::from_tokens(400_000));
        assert_eq!(epochs[3].kind, EpochKind::Halving);

        let summary = &projection.summary;
        assert_eq!(summary.termination, Termination::MaxSupplyReached);
        assert_eq!(summary.total_supply, Amount::from_tokens(10_000));
        assert_eq!(summary.total_secondary_burned, Amount::from_tokens(3_400_000));
        assert_eq!(summary.total_usd_cost, UsdValue::from_cents(1_700_000));
    }

    #[test]
    fn test_marginal_cost_doubles_with_each_halving() {
        let projection = simulate(params(10_000, 1_000, 1_000_000, 5_000, 50)).unwrap();
        let costs: Vec<UsdValue> = projection
            .epochs
            .iter()
            .map(|e| e.usd_cost_per_token)
            .collect();

        assert_eq!(
            costs,
            vec![
                UsdValue::from_cents(100),
                UsdValue::from_cents(200),
                UsdValue::from_cents(400),
                UsdValue::from_cents(800),
            ]
        );
    }

    #[test]
    fn test_settlement_epoch_closes_supply() {
        let projection = simulate(params(1_000_000, 1, 1_000_000, 20_000, 50)).unwrap();
        let last = projection.epochs.last().unwrap();

        assert_eq!(projection.summary.halving_epochs, 41);
        assert_eq!(projection.summary.epoch_count, 42);
        assert_eq!(last.kind, EpochKind::Settlement);
        assert_eq!(last.index, 41);
        assert_eq!(last.reward_rate, Amount::from_e8s(1));
        assert_eq!(last.primary_minted_this_epoch, Amount::from_e8s(95_999_900_000_013));
        assert_eq!(last.primary_minted_cumulative, Amount::from_tokens(999_999));
        assert_eq!(projection.summary.termination, Termination::ScheduleExhausted);
    }

    #[test]
    fn test_custom_secondary_price() {
        let curve = BondingCurve::new(params(10_000, 1_000, 1_000_000, 5_000, 50))
            .with_secondary_price(UsdValue::from_cents(1));
        let projection = curve.simulate().unwrap();

        // 1M secondary at $0.01 for 5,000 primary = $2 per token
        assert_eq!(projection.epochs[0].usd_cost_per_token, UsdValue::from_cents(200));
        assert_eq!(projection.secondary_usd_price, UsdValue::from_cents(1));
    }

    #[test]
    fn test_multiplication_overflow_aborts() {
        let err = LaunchParameters::new(
            Amount::from_tokens(1_000_000),
            Amount::from_tokens(1),
            Amount::from_e8s(1),
            Amount::MAX,
            50,
        )
        .unwrap_err();
        assert!(matches!(err, TokenomicsError::MultiplicationOverflow { .. }));
        assert!(err.is_engine_failure());

        // Largest representable first rate still simulates
        let params = LaunchParameters::new(
            Amount::from_tokens(1_000_000),
            Amount::from_tokens(1),
            Amount::from_e8s(1),
            Amount::from_e8s(u128::MAX / 50),
            50,
        )
        .unwrap();
        let projection = simulate(params).unwrap();
        assert_eq!(projection.epochs.len(), 1);
        assert_eq!(projection.epochs[0].secondary_burned, Amount::from_e8s(1));
    }

    #[test]
    fn test_partial_epoch_never_burns_zero() {
        // 1 e8s of headroom at 20,000 tokens per 1-token unit
        let params = LaunchParameters::new(
            Amount::from_tokens(1_000_000),
            Amount::from_e8s(100_000_000_000_000 - 1),
            Amount::from_tokens(1),
            Amount::from_tokens(20_000),
            50,
        )
        .unwrap();

        let projection = simulate(params).unwrap();
        assert_eq!(projection.epochs.len(), 1);
        assert_eq!(projection.epochs[0].primary_minted_this_epoch, Amount::from_e8s(1));
        assert_eq!(projection.epochs[0].secondary_burned, Amount::from_e8s(1));
    }

    #[test]
    fn test_projection_rate_at_covers_settlement() {
        let projection = simulate(params(1_000_000, 1, 1_000_000, 20_000, 50)).unwrap();
        let unit = Amount::from_tokens(1_000_000);

        assert_eq!(projection.rate_at(Amount::ZERO), Amount::from_tokens(20_000));
        assert_eq!(projection.rate_at(unit), Amount::from_tokens(10_000));

        // First burn level of the settlement epoch
        let settling = projection.epochs[40].secondary_burned_cumulative;
        assert_eq!(projection.rate_at(settling), Amount::from_e8s(1));

        let closed = projection.summary.total_secondary_burned;
        assert_eq!(projection.rate_at(closed), Amount::ZERO);
    }

    #[test]
    fn test_epoch_labels() {
        let projection = simulate(params(10_000, 1_000, 1_000_000, 5_000, 50)).unwrap();
        assert_eq!(projection.epochs[0].label(), "Epoch 1");
        assert_eq!(projection.epochs[3].label(), "Epoch 4");
    }
}
