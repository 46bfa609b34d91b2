//! # Price Quotes
//!
//! A USD price observed at a point in time, and a cache that refuses to hand
//! it out once it is older than its staleness window (5 minutes by default).
//! The cache is a plain value owned by whoever fetches prices; there is no
//! process-wide price state.

use crate::amount::{Amount, UsdValue};
use crate::config::PricingConfig;
use crate::constants::PRICE_STALENESS_SECS;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// USD price of one whole token at a point in time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// USD per whole token
    pub usd_price: UsdValue,
    /// When the price was observed
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(usd_price: UsdValue, fetched_at: DateTime<Utc>) -> Self {
        Self {
            usd_price,
            fetched_at,
        }
    }

    /// Age of the quote at `now`; negative ages count as zero
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let age = now - self.fetched_at;
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    /// USD value of `amount` at this price
    pub fn value_of(&self, amount: Amount) -> Result<UsdValue> {
        self.usd_price.times_tokens(amount, "quote valuation")
    }
}

/// Single-entry price cache with an explicit staleness window
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceCache {
    quote: Option<PriceQuote>,
    max_age: Duration,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(Duration::seconds(PRICE_STALENESS_SECS))
    }
}

impl PriceCache {
    pub fn new(max_age: Duration) -> Self {
        Self { quote: None, max_age }
    }

    /// Empty cache with the configured staleness window
    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(Duration::seconds(config.price_staleness_secs))
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Replace the cached quote
    pub fn store(&mut self, quote: PriceQuote) {
        self.quote = Some(quote);
    }

    /// The cached quote if it is still within the staleness window
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&PriceQuote> {
        self.quote.as_ref().filter(|q| q.age(now) < self.max_age)
    }

    /// True when there is no quote or it has aged out
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.fresh(now).is_none()
    }

    pub fn clear(&mut self) {
        self.quote = None;
    }
}
