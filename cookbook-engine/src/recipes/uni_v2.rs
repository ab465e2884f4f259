use std::sync::Arc;

use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        liquidity::UniswapV2Fork, recipe::RecipeConfig, step::StepInput, token::ERC20Amount,
        Network,
    },
    traits::{AddLiquidityParams, LiquidityQuoter},
};
use tracing::debug;

use crate::{
    lookup::{with_timeout, EXTERNAL_LOOKUP_TIMEOUT},
    recipe::Recipe,
    step::{matching::find_first_input, Step},
    steps::{ApproveERC20SpenderStep, UniV2LikeAddLiquidityStep},
};

/// Adds unshielded liquidity to a Uniswap V2 style pair and shields the LP tokens.
pub struct UniV2LikeAddLiquidityRecipe {
    config: RecipeConfig,
    chain_config: Arc<ChainConfig>,
    quoter: Arc<dyn LiquidityQuoter>,
    fork: UniswapV2Fork,
    erc20_amount_a: ERC20Amount,
    erc20_amount_b: ERC20Amount,
    slippage_basis_points: u64,
}

impl UniV2LikeAddLiquidityRecipe {
    pub fn new(
        chain_config: Arc<ChainConfig>,
        quoter: Arc<dyn LiquidityQuoter>,
        fork: UniswapV2Fork,
        erc20_amount_a: ERC20Amount,
        erc20_amount_b: ERC20Amount,
        slippage_basis_points: u64,
    ) -> Self {
        Self {
            config: RecipeConfig::new(
                format!("{fork} Add Liquidity Recipe"),
                "Adds liquidity to a Uniswap V2-like pair.",
            )
            .non_deterministic(),
            chain_config,
            quoter,
            fork,
            erc20_amount_a,
            erc20_amount_b,
            slippage_basis_points,
        }
    }
}

#[async_trait]
impl Recipe for UniV2LikeAddLiquidityRecipe {
    fn config(&self) -> &RecipeConfig {
        &self.config
    }

    fn chain_config(&self) -> &Arc<ChainConfig> {
        &self.chain_config
    }

    fn supports_network(&self, network: Network) -> bool {
        self.fork.supports_network(network) && self.chain_config.network(network).is_ok()
    }

    async fn get_internal_steps(
        &self,
        first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError> {
        let ledger = &first_internal_step_input.erc20_amounts;
        find_first_input(ledger, &self.erc20_amount_a.token)?;
        find_first_input(ledger, &self.erc20_amount_b.token)?;

        let params = AddLiquidityParams {
            fork: self.fork,
            erc20_amount_a: self.erc20_amount_a.clone(),
            erc20_amount_b: self.erc20_amount_b.clone(),
            slippage_basis_points: self.slippage_basis_points,
        };
        let data = with_timeout(
            "add liquidity quote",
            EXTERNAL_LOOKUP_TIMEOUT,
            self.quoter
                .add_liquidity_data(first_internal_step_input.network, &params),
        )
        .await?;
        debug!(
            router = %data.router_contract,
            lp_amount = %data.expected_lp_amount.amount,
            min_lp_amount = %data.min_lp_amount,
            "Fetched add liquidity data"
        );

        Ok(vec![
            Box::new(ApproveERC20SpenderStep::new(
                data.router_contract,
                data.erc20_amount_a.token.clone(),
                Some(data.erc20_amount_a.amount),
            )),
            Box::new(ApproveERC20SpenderStep::new(
                data.router_contract,
                data.erc20_amount_b.token.clone(),
                Some(data.erc20_amount_b.amount),
            )),
            Box::new(UniV2LikeAddLiquidityStep::new(self.chain_config.clone(), self.fork, data)),
        ])
    }
}
