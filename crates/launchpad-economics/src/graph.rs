//! # Graph Series Projection
//!
//! Reshapes a curve projection into the parallel series a charting layer
//! renders. Every series is index-aligned and starts with a synthetic TGE
//! row:
//!
//! | Series | Row 0 (TGE) | Row n (epoch n) |
//! |--------|-------------|-----------------|
//! | `minted_per_epoch_data_x` | `"TGE"` | `"Epoch n"` |
//! | `minted_per_epoch_data_y` | tge_allocation | minted this epoch |
//! | `cumulative_supply_data_x` | 0 | secondary burned so far |
//! | `cumulative_supply_data_y` | tge_allocation | total primary supply |
//! | `cost_to_mint_data_x` | tge_allocation | total primary supply |
//! | `cost_to_mint_data_y` | 0 | USD per primary token |
//! | `cumulative_usd_cost_data_x` | tge_allocation | total primary supply |
//! | `cumulative_usd_cost_data_y` | 0 | USD spent so far |

use crate::amount::{Amount, UsdValue};
use crate::constants::TGE_LABEL;
use crate::curve::{BondingCurve, CurveProjection, CurveSummary};
use crate::error::Result;
use crate::params::LaunchRequest;
use serde::{Deserialize, Serialize};

/// Chart-ready series
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub minted_per_epoch_data_x: Vec<String>,
    pub minted_per_epoch_data_y: Vec<Amount>,
    pub cumulative_supply_data_x: Vec<Amount>,
    pub cumulative_supply_data_y: Vec<Amount>,
    pub cost_to_mint_data_x: Vec<Amount>,
    pub cost_to_mint_data_y: Vec<UsdValue>,
    pub cumulative_usd_cost_data_x: Vec<Amount>,
    pub cumulative_usd_cost_data_y: Vec<UsdValue>,
}

impl GraphData {
    /// Project a finished simulation
    pub fn from_projection(projection: &CurveProjection) -> Result<Self> {
        let tge = projection.params.tge_allocation();
        let rows = projection.epochs.len() + 1;
        let mut graph = Self::with_capacity(rows);

        graph.push_row(
            TGE_LABEL.to_string(),
            tge,
            Amount::ZERO,
            tge,
            UsdValue::ZERO,
            UsdValue::ZERO,
        );

        for epoch in &projection.epochs {
            let total_supply = tge.try_add(epoch.primary_minted_cumulative, "projected supply")?;
            graph.push_row(
                epoch.label(),
                epoch.primary_minted_this_epoch,
                epoch.secondary_burned_cumulative,
                total_supply,
                epoch.usd_cost_per_token,
                epoch.usd_cost_cumulative,
            );
        }

        Ok(graph)
    }

    fn with_capacity(rows: usize) -> Self {
        Self {
            minted_per_epoch_data_x: Vec::with_capacity(rows),
            minted_per_epoch_data_y: Vec::with_capacity(rows),
            cumulative_supply_data_x: Vec::with_capacity(rows),
            cumulative_supply_data_y: Vec::with_capacity(rows),
            cost_to_mint_data_x: Vec::with_capacity(rows),
            cost_to_mint_data_y: Vec::with_capacity(rows),
            cumulative_usd_cost_data_x: Vec::with_capacity(rows),
            cumulative_usd_cost_data_y: Vec::with_capacity(rows),
        }
    }

    fn push_row(
        &mut self,
        label: String,
        minted: Amount,
        burned_cumulative: Amount,
        total_supply: Amount,
        cost_per_token: UsdValue,
        cost_cumulative: UsdValue,
    ) {
        self.minted_per_epoch_data_x.push(label);
        self.minted_per_epoch_data_y.push(minted);
        self.cumulative_supply_data_x.push(burned_cumulative);
        self.cumulative_supply_data_y.push(total_supply);
        self.cost_to_mint_data_x.push(total_supply);
        self.cost_to_mint_data_y.push(cost_per_token);
        self.cumulative_usd_cost_data_x.push(total_supply);
        self.cumulative_usd_cost_data_y.push(cost_cumulative);
    }

    /// Rows including the TGE row
    pub fn len(&self) -> usize {
        self.minted_per_epoch_data_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minted_per_epoch_data_x.is_empty()
    }
}

/// Series plus the engine's terminal summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenomicsPreview {
    pub graph: GraphData,
    pub summary: CurveSummary,
}

/// Validate, simulate and project at the given secondary price
pub fn preview(request: &LaunchRequest, secondary_usd_price: UsdValue) -> Result<TokenomicsPreview> {
    let params = request.validate()?;
    let projection = BondingCurve::new(params)
        .with_secondary_price(secondary_usd_price)
        .simulate()?;
    let graph = GraphData::from_projection(&projection)?;

    Ok(TokenomicsPreview {
        graph,
        summary: projection.summary,
    })
}

/// Graph series at the default secondary burn price
pub fn preview_tokenomics(request: &LaunchRequest) -> Result<GraphData> {
    let params = request.validate()?;
    let projection = BondingCurve::new(params).simulate()?;
    GraphData::from_projection(&projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::E8S;
    use crate::error::TokenomicsError;

    fn request(step: u8) -> LaunchRequest {
        LaunchRequest {
            primary_max_supply: 10_000 * E8S as u64,
            tge_allocation: 1_000 * E8S as u64,
            initial_secondary_burn: 1_000_000 * E8S as u64,
            initial_reward_per_burn_unit: 5_000 * E8S as u64,
            halving_step_percent: step,
        }
    }

    #[test]
    fn test_tge_row_first() {
        let graph = preview_tokenomics(&request(50)).unwrap();

        assert_eq!(graph.minted_per_epoch_data_x[0], "TGE");
        assert_eq!(graph.minted_per_epoch_data_y[0], Amount::from_tokens(1_000));
        assert_eq!(graph.cumulative_supply_data_x[0], Amount::ZERO);
        assert_eq!(graph.cumulative_supply_data_y[0], Amount::from_tokens(1_000));
        assert_eq!(graph.cost_to_mint_data_y[0], UsdValue::ZERO);
        assert_eq!(graph.cumulative_usd_cost_data_y[0], UsdValue::ZERO);
    }

    #[test]
    fn test_series_index_aligned() {
        let graph = preview_tokenomics(&request(50)).unwrap();

        assert_eq!(graph.len(), 5);
        assert_eq!(graph.minted_per_epoch_data_y.len(), 5);
        assert_eq!(graph.cumulative_supply_data_x.len(), 5);
        assert_eq!(graph.cumulative_supply_data_y.len(), 5);
        assert_eq!(graph.cost_to_mint_data_x.len(), 5);
        assert_eq!(graph.cost_to_mint_data_y.len(), 5);
        assert_eq!(graph.cumulative_usd_cost_data_x.len(), 5);
        assert_eq!(graph.cumulative_usd_cost_data_y.len(), 5);

        assert_eq!(graph.minted_per_epoch_data_x[4], "Epoch 4");
        assert_eq!(graph.cumulative_supply_data_y[4], Amount::from_tokens(10_000));
        assert_eq!(graph.cumulative_usd_cost_data_y[4], UsdValue::from_cents(1_700_000));
    }

    #[test]
    fn test_invalid_request_fails_before_engine() {
        let mut r = request(50);
        r.halving_step_percent = 0;
        assert!(matches!(
            preview_tokenomics(&r),
            Err(TokenomicsError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_preview_carries_summary() {
        let preview = preview(&request(50), UsdValue::from_cents(1)).unwrap();
        assert_eq!(preview.summary.epoch_count as usize + 1, preview.graph.len());
        assert_eq!(preview.graph.cost_to_mint_data_y[1], UsdValue::from_cents(200));
    }

    #[test]
    fn test_json_shape() {
        let graph = preview_tokenomics(&request(50)).unwrap();
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["minted_per_epoch_data_x"][0], "TGE");
        assert_eq!(json["cost_to_mint_data_y"][1], "1.00000000");
        assert!(json["cumulative_supply_data_y"][1].is_u64());
    }
}
