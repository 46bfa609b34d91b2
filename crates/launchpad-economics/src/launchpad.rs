//! # Token Launchpad
//!
//! Accepts token creation requests, checks them, runs the full tokenomics
//! simulation once, and keeps a record of every launched pair.
//!
//! ## Creation Checks
//!
//! | Check | Error |
//! |-------|-------|
//! | Fee paid below the creation fee | MinimumRequired |
//! | Empty/oversized name or symbol, duplicate symbol | InvalidInput |
//! | Phase mint zero or above max supply | InvalidAmount |
//! | Launch parameters (see `params`) | InvalidAmount |
//! | Simulation arithmetic | AdditionOverflow / MultiplicationOverflow / Underflow / DivisionFailed |
//!
//! Records live in memory for the lifetime of the `Launchpad`.

use crate::amount::{Amount, UsdValue};
use crate::config::{EconomicsConfig, LaunchConfig, PricingConfig};
use crate::curve::{BondingCurve, CurveSummary};
use crate::error::{Result, TokenomicsError, DEFAULT_MINIMUM_REQUIRED_ERROR};
use crate::params::LaunchRequest;
use crate::pricing::PriceCache;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive metadata for one token of the pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    /// Base64 SVG logo
    #[serde(default)]
    pub logo: String,
}

impl TokenMetadata {
    /// Name and symbol with surrounding whitespace removed
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            symbol: self.symbol.trim().to_string(),
            ..self
        }
    }
}

/// Request to launch a primary/secondary token pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub primary: TokenMetadata,
    pub secondary: TokenMetadata,
    /// Cap on primary minted by a single burn, e8s
    pub primary_max_phase_mint: u64,
    /// Tokenomics parameters
    pub launch: LaunchRequest,
    /// Fee transferred by the creator, e8s
    pub fee_paid_e8s: u64,
}

/// Stored launch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: u64,
    pub owner: String,
    pub primary_token_name: String,
    pub primary_token_symbol: String,
    pub primary_token_max_supply: u64,
    pub secondary_token_name: String,
    pub secondary_token_symbol: String,
    pub tge_allocation: u64,
    pub initial_secondary_burn: u64,
    pub initial_reward_per_burn_unit: u64,
    pub halving_step_percent: u8,
    pub primary_max_phase_mint: u64,
    pub created_time: DateTime<Utc>,
    pub liquidity_provided_at: Option<DateTime<Utc>>,
    pub is_live: bool,
}

/// Confirmation returned to the creator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreated {
    pub id: u64,
    pub primary_token_symbol: String,
    pub secondary_token_symbol: String,
    pub created_time: DateTime<Utc>,
    pub fee_paid_e8s: u64,
    /// Fee in USD, when a fresh fee-token quote was available
    pub fee_usd: Option<UsdValue>,
    /// Outcome of the launch simulation
    pub curve: CurveSummary,
}

/// In-memory launch registry
pub struct Launchpad {
    config: LaunchConfig,
    pricing: PricingConfig,
    tokens: RwLock<BTreeMap<u64, TokenRecord>>,
}

impl Launchpad {
    pub fn new(config: &EconomicsConfig) -> Self {
        Self {
            config: config.launch.clone(),
            pricing: config.pricing.clone(),
            tokens: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Empty fee-token price cache using the configured staleness window
    pub fn price_cache(&self) -> PriceCache {
        PriceCache::from_config(&self.pricing)
    }

    /// Launch a token pair.
    ///
    /// `fee_prices` holds the fee token's USD quote; a stale or missing
    /// quote only leaves `fee_usd` empty.
    pub fn create_token(
        &self,
        owner: &str,
        mut request: CreateTokenRequest,
        fee_prices: &PriceCache,
        now: DateTime<Utc>,
    ) -> Result<TokenCreated> {
        request.primary = request.primary.normalized();
        request.secondary = request.secondary.normalized();
        let owner = owner.trim();

        if request.fee_paid_e8s < self.config.creation_fee_e8s {
            return Err(TokenomicsError::MinimumRequired {
                required: self.config.creation_fee_e8s,
                provided: request.fee_paid_e8s,
                token: self.config.fee_token.clone(),
                details: DEFAULT_MINIMUM_REQUIRED_ERROR.to_string(),
            });
        }

        if owner.is_empty() {
            return Err(TokenomicsError::invalid_input("owner is empty"));
        }
        self.check_metadata("primary", &request.primary)?;
        self.check_metadata("secondary", &request.secondary)?;
        if request
            .primary
            .symbol
            .eq_ignore_ascii_case(&request.secondary.symbol)
        {
            return Err(TokenomicsError::invalid_input(
                "primary and secondary symbols must differ",
            ));
        }

        let params = request.launch.validate()?;
        if request.primary_max_phase_mint == 0
            || Amount::from(request.primary_max_phase_mint) > params.primary_max_supply()
        {
            return Err(TokenomicsError::invalid_amount(
                "phase mint out of range",
                format!(
                    "primary_max_phase_mint: {} with primary_max_supply: {}",
                    request.primary_max_phase_mint, request.launch.primary_max_supply
                ),
            ));
        }

        let projection = BondingCurve::new(params)
            .with_secondary_price(self.pricing.secondary_usd_price)
            .simulate()?;

        let fee_usd = match fee_prices.fresh(now) {
            Some(quote) => Some(quote.value_of(Amount::from(request.fee_paid_e8s))?),
            None => None,
        };

        let mut tokens = self.tokens.write();

        // Checked under the write lock so concurrent launches cannot race
        let taken = tokens.values().any(|t| {
            [&t.primary_token_symbol, &t.secondary_token_symbol]
                .iter()
                .any(|stored| {
                    stored.eq_ignore_ascii_case(&request.primary.symbol)
                        || stored.eq_ignore_ascii_case(&request.secondary.symbol)
                })
        });
        if taken {
            return Err(TokenomicsError::invalid_input(format!(
                "symbol already launched: {} / {}",
                request.primary.symbol, request.secondary.symbol
            )));
        }

        let id = tokens.keys().next_back().map(|id| id + 1).unwrap_or(1);
        let record = TokenRecord {
            id,
            owner: owner.to_string(),
            primary_token_name: request.primary.name.clone(),
            primary_token_symbol: request.primary.symbol.clone(),
            primary_token_max_supply: request.launch.primary_max_supply,
            secondary_token_name: request.secondary.name.clone(),
            secondary_token_symbol: request.secondary.symbol.clone(),
            tge_allocation: request.launch.tge_allocation,
            initial_secondary_burn: request.launch.initial_secondary_burn,
            initial_reward_per_burn_unit: request.launch.initial_reward_per_burn_unit,
            halving_step_percent: request.launch.halving_step_percent,
            primary_max_phase_mint: request.primary_max_phase_mint,
            created_time: now,
            liquidity_provided_at: None,
            is_live: false,
        };
        tokens.insert(id, record);
        drop(tokens);

        tracing::info!(
            id,
            primary = %request.primary.symbol,
            secondary = %request.secondary.symbol,
            epochs = projection.summary.epoch_count,
            "Token pair created"
        );

        Ok(TokenCreated {
            id,
            primary_token_symbol: request.primary.symbol,
            secondary_token_symbol: request.secondary.symbol,
            created_time: now,
            fee_paid_e8s: request.fee_paid_e8s,
            fee_usd,
            curve: projection.summary,
        })
    }

    /// Expects normalized metadata
    fn check_metadata(&self, which: &str, meta: &TokenMetadata) -> Result<()> {
        let name = meta.name.as_str();
        if name.is_empty() || name.len() > self.config.max_name_len {
            return Err(TokenomicsError::invalid_input(format!(
                "{} token name must be 1-{} characters",
                which, self.config.max_name_len
            )));
        }

        let symbol = meta.symbol.as_str();
        if symbol.is_empty()
            || symbol.len() > self.config.max_symbol_len
            || !symbol.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(TokenomicsError::invalid_input(format!(
                "{} token symbol must be 1-{} ASCII letters or digits",
                which, self.config.max_symbol_len
            )));
        }

        Ok(())
    }

    /// Flag a token as live once its liquidity pool is seeded
    pub fn mark_live(&self, id: u64, at: DateTime<Utc>) -> Result<TokenRecord> {
        let mut tokens = self.tokens.write();
        let record = tokens
            .get_mut(&id)
            .ok_or(TokenomicsError::TokenNotFound { id })?;

        record.is_live = true;
        record.liquidity_provided_at = Some(at);
        tracing::info!(id, "Token marked live");
        Ok(record.clone())
    }

    pub fn get(&self, id: u64) -> Option<TokenRecord> {
        self.tokens.read().get(&id).cloned()
    }

    pub fn get_all_token_records(&self) -> Vec<(u64, TokenRecord)> {
        self.tokens
            .read()
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect()
    }

    /// Launched but not yet live
    pub fn upcoming(&self) -> Vec<TokenRecord> {
        self.filtered(|t| !t.is_live)
    }

    pub fn live(&self) -> Vec<TokenRecord> {
        self.filtered(|t| t.is_live)
    }

    fn filtered(&self, keep: impl Fn(&TokenRecord) -> bool) -> Vec<TokenRecord> {
        self.tokens
            .read()
            .values()
            .filter(|t| keep(t))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl Default for Launchpad {
    fn default() -> Self {
        Self::new(&EconomicsConfig::default())
    }
}
