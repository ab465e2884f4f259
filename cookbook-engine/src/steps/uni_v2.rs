//! Liquidity provision on Uniswap V2 style pairs.

use std::sync::Arc;

use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        liquidity::UniswapV2Fork,
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20AmountRecipient, ERC20Balance},
    },
    traits::AddLiquidityData,
};
use cookbook_ethereum::uni_v2::create_add_liquidity;

use crate::step::{
    ledger::consolidate,
    matching::{select_inputs, ERC20Filter, RequestedAmount},
    Step,
};

/// Deposits two tokens, both approved for the router, into their pair in a single call.
pub struct UniV2LikeAddLiquidityStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    data: AddLiquidityData,
}

impl UniV2LikeAddLiquidityStep {
    pub fn new(chain_config: Arc<ChainConfig>, fork: UniswapV2Fork, data: AddLiquidityData) -> Self {
        Self {
            config: StepConfig::new(
                format!("{fork} Add Liquidity"),
                "Adds liquidity to a Uniswap V2-like pair.",
            )
            .non_deterministic(),
            chain_config,
            data,
        }
    }
}

#[async_trait]
impl Step for UniV2LikeAddLiquidityStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let data = &self.data;
        let relay_adapt = self
            .chain_config
            .network(input.network)?
            .relay_adapt(input.network)?;
        let router = data.router_contract;

        let requests = [&data.erc20_amount_a, &data.erc20_amount_b].map(|deposit| {
            (
                ERC20Filter::token(deposit.token.clone()).approved_for(router),
                RequestedAmount::exact(deposit.amount),
            )
        });
        let (deposits, unused) = select_inputs(&self.config.name, &input.erc20_amounts, &requests)?;

        let minted = ERC20Balance::new(data.expected_lp_amount.token.clone(), data.expected_lp_amount.amount)
            .with_min_balance(data.min_lp_amount);

        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![create_add_liquidity(data, relay_adapt)],
            spent_erc20_amounts: deposits
                .into_iter()
                .map(|deposit| {
                    ERC20AmountRecipient::to_address(deposit.token, deposit.expected_balance, &router)
                })
                .collect(),
            output_erc20_amounts: consolidate(std::iter::once(minted).chain(unused)),
            ..Default::default()
        })
    }
}
