//! # Halving Schedule
//!
//! Reward rate per burn unit, stepped down at every burn-unit boundary.
//!
//! ```text
//! rate(0)   = initial_reward_per_burn_unit
//! rate(n+1) = floor(rate(n) * (100 - halving_step_percent) / 100)
//! ```
//!
//! With a 50% step and 20,000 tokens per burn unit:
//!
//! ```text
//! Epoch 1:  20,000 tokens / burn unit
//! Epoch 2:  10,000 tokens / burn unit
//! Epoch 3:   5,000 tokens / burn unit
//! ...
//! Epoch 41:  0.00000001 tokens / burn unit
//! (rate truncates to zero: schedule ends)
//! ```
//!
//! A zero rate is the terminal state. Every step with `rate > 0` strictly
//! decreases the rate, so the number of tiers is bounded by the initial
//! rate and the step size alone.
//!
//! Construction fails with `MultiplicationOverflow` when the first decay
//! step of the initial rate is not representable; no later step can fail.

use crate::amount::Amount;
use crate::constants::{MAX_HALVING_STEP_PERCENT, MIN_HALVING_STEP_PERCENT};
use crate::error::{Result, TokenomicsError};
use crate::params::LaunchParameters;
use serde::{Deserialize, Serialize};

/// One step of the schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTier {
    /// Zero-based epoch index
    pub index: u32,
    /// Primary minted per burn unit during this epoch, e8s
    pub reward_rate: Amount,
}

/// Apply one halving step to `rate`
pub fn next_reward_rate(rate: Amount, halving_step_percent: u8) -> Result<Amount> {
    let retained = 100 - u128::from(halving_step_percent.min(100));
    rate.try_mul(retained, "halving step")?
        .try_div(100, "halving step")
}

/// Lazily evaluated halving schedule
#[derive(Clone, Debug)]
pub struct HalvingSchedule {
    /// Rate of the first epoch
    initial_reward: Amount,
    /// Percentage cut per step
    halving_step_percent: u8,
    /// Secondary burned per epoch
    burn_unit: Amount,
    /// Rate of the last tier handed out
    current_rate: Amount,
    /// Tiers handed out so far
    produced: u32,
    /// Set once the rate reached zero or a step failed
    finished: bool,
}

impl HalvingSchedule {
    pub fn new(initial_reward: Amount, halving_step_percent: u8, burn_unit: Amount) -> Result<Self> {
        if !(MIN_HALVING_STEP_PERCENT..=MAX_HALVING_STEP_PERCENT).contains(&halving_step_percent) {
            return Err(TokenomicsError::invalid_amount(
                "halving step out of range",
                format!("halving_step_percent: {}", halving_step_percent),
            ));
        }
        if burn_unit.is_zero() {
            return Err(TokenomicsError::DivisionFailed {
                operation: "halving schedule".to_string(),
                details: "burn unit size is zero".to_string(),
            });
        }

        // Rates only fall, so a representable first decay bounds every later one
        next_reward_rate(initial_reward, halving_step_percent)?;

        Ok(Self {
            initial_reward,
            halving_step_percent,
            burn_unit,
            current_rate: initial_reward,
            produced: 0,
            finished: initial_reward.is_zero(),
        })
    }

    pub fn from_params(params: &LaunchParameters) -> Result<Self> {
        Self::new(
            params.initial_reward_per_burn_unit(),
            params.halving_step_percent(),
            params.burn_unit(),
        )
    }

    pub fn burn_unit(&self) -> Amount {
        self.burn_unit
    }

    pub fn halving_step_percent(&self) -> u8 {
        self.halving_step_percent
    }

    /// Next tier, or `None` once the rate has decayed to zero.
    ///
    /// The decay for tier `n + 1` is computed only when it is requested.
    pub fn next_tier(&mut self) -> Result<Option<RewardTier>> {
        if self.finished {
            return Ok(None);
        }

        if self.produced > 0 {
            match next_reward_rate(self.current_rate, self.halving_step_percent) {
                Ok(rate) => self.current_rate = rate,
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }
            if self.current_rate.is_zero() {
                self.finished = true;
                return Ok(None);
            }
        }

        let tier = RewardTier {
            index: self.produced,
            reward_rate: self.current_rate,
        };
        self.produced += 1;
        Ok(Some(tier))
    }

    /// Fresh copy positioned at epoch 0
    pub fn restart(&self) -> Self {
        Self {
            current_rate: self.initial_reward,
            produced: 0,
            finished: self.initial_reward.is_zero(),
            ..self.clone()
        }
    }

    /// Every tier from epoch 0 until the terminal state
    pub fn tiers(&self) -> Result<Vec<RewardTier>> {
        self.restart().collect()
    }

    /// Schedule rate once `secondary_burned_cumulative` has been burned,
    /// assuming every epoch burns a full unit. Zero past the end of the
    /// schedule; the curve's settlement epoch is not modelled here, see
    /// `CurveProjection::rate_at` for the rate the engine actually applied.
    ///
    /// Walks at most `epoch` decay steps.
    pub fn rate_at(&self, secondary_burned_cumulative: Amount) -> Result<Amount> {
        let epoch = secondary_burned_cumulative
            .try_div(self.burn_unit.e8s(), "epoch for burn level")?
            .e8s();
        let Ok(epoch) = usize::try_from(epoch) else {
            return Ok(Amount::ZERO);
        };

        match self.restart().nth(epoch).transpose()? {
            Some(tier) => Ok(tier.reward_rate),
            None => Ok(Amount::ZERO),
        }
    }
}

impl Iterator for HalvingSchedule {
    type Item = Result<RewardTier>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tier().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(initial_tokens: u64, step: u8) -> HalvingSchedule {
        HalvingSchedule::new(
            Amount::from_tokens(initial_tokens),
            step,
            Amount::from_tokens(1_000_000),
        )
        .unwrap()
    }

    #[test]
    fn test_fifty_percent_halving() {
        let tiers = schedule(20_000, 50).tiers().unwrap();

        assert_eq!(tiers[0].reward_rate, Amount::from_tokens(20_000));
        assert_eq!(tiers[1].reward_rate, Amount::from_tokens(10_000));
        assert_eq!(tiers[2].reward_rate, Amount::from_tokens(5_000));

        // 2e12 e8s halves exactly to 1 after 40 steps
        assert_eq!(tiers.len(), 41);
        assert_eq!(tiers[40].reward_rate, Amount::from_e8s(1));
    }

    #[test]
    fn test_truncating_step() {
        let rate = next_reward_rate(Amount::from_e8s(7), 25).unwrap();
        // 7 * 75 / 100 = 5.25
        assert_eq!(rate, Amount::from_e8s(5));

        let rate = next_reward_rate(Amount::from_e8s(1), 50).unwrap();
        assert_eq!(rate, Amount::ZERO);
    }

    #[test]
    fn test_steep_step_terminates() {
        let tiers = schedule(20_000, 99).tiers().unwrap();
        assert_eq!(tiers.len(), 7);
        assert_eq!(tiers.last().unwrap().reward_rate, Amount::from_e8s(2));
    }

    #[test]
    fn test_rates_strictly_decrease() {
        for step in [1u8, 25, 50, 90, 99] {
            let tiers = schedule(20_000, step).tiers().unwrap();
            for pair in tiers.windows(2) {
                assert!(pair[1].reward_rate < pair[0].reward_rate, "step {}", step);
                assert_eq!(pair[1].index, pair[0].index + 1);
            }
        }
    }

    #[test]
    fn test_unrepresentable_initial_rate() {
        let err = HalvingSchedule::new(Amount::MAX, 50, Amount::from_e8s(1)).unwrap_err();
        assert!(matches!(err, TokenomicsError::MultiplicationOverflow { .. }));

        // Largest rate whose 1% cut still fits
        let edge = Amount::from_e8s(u128::MAX / 99);
        let mut s = HalvingSchedule::new(edge, 1, Amount::from_e8s(1)).unwrap();
        assert_eq!(s.next_tier().unwrap().unwrap().reward_rate, edge);
        assert!(s.next_tier().unwrap().unwrap().reward_rate < edge);
    }

    #[test]
    fn test_rate_at_burn_level() {
        let s = schedule(20_000, 50);
        let unit = s.burn_unit();

        assert_eq!(s.rate_at(Amount::ZERO).unwrap(), Amount::from_tokens(20_000));
        let just_below = unit.try_sub(Amount::from_e8s(1), "test").unwrap();
        assert_eq!(s.rate_at(just_below).unwrap(), Amount::from_tokens(20_000));
        assert_eq!(s.rate_at(unit).unwrap(), Amount::from_tokens(10_000));

        let far = unit.try_mul(1_000, "test").unwrap();
        assert_eq!(s.rate_at(far).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(HalvingSchedule::new(Amount::from_tokens(1), 0, Amount::from_tokens(1)).is_err());
        assert!(HalvingSchedule::new(Amount::from_tokens(1), 100, Amount::from_tokens(1)).is_err());
        assert!(matches!(
            HalvingSchedule::new(Amount::from_tokens(1), 50, Amount::ZERO),
            Err(TokenomicsError::DivisionFailed { .. })
        ));
    }
}
