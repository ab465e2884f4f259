use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{recipe::RecipeConfig, step::StepInput, token::ERC20Info, Network},
    traits::{SwapQuoteParams, SwapQuoter},
};
use tracing::debug;

use crate::{
    lookup::{with_timeout, EXTERNAL_LOOKUP_TIMEOUT},
    recipe::Recipe,
    step::{
        matching::{find_first_input, RequestedAmount},
        Step,
    },
    steps::{ApproveERC20SpenderStep, ZeroXSwapStep},
};

/// Swaps one unshielded token for another through the 0x aggregator.
pub struct ZeroXSwapRecipe {
    config: RecipeConfig,
    chain_config: Arc<ChainConfig>,
    quoter: Arc<dyn SwapQuoter>,
    sell_token: ERC20Info,
    buy_token: ERC20Info,
    sell_amount: RequestedAmount,
    slippage_basis_points: u64,
}

impl ZeroXSwapRecipe {
    pub fn new(
        chain_config: Arc<ChainConfig>,
        quoter: Arc<dyn SwapQuoter>,
        sell_token: ERC20Info,
        buy_token: ERC20Info,
        sell_amount: Option<U256>,
        slippage_basis_points: u64,
    ) -> Self {
        Self {
            config: RecipeConfig::new(
                "0x Exchange Swap",
                "Swaps two ERC20 tokens using 0x Exchange DEX Aggregator.",
            )
            .non_deterministic(),
            chain_config,
            quoter,
            sell_token,
            buy_token,
            sell_amount: sell_amount.into(),
            slippage_basis_points,
        }
    }
}

#[async_trait]
impl Recipe for ZeroXSwapRecipe {
    fn config(&self) -> &RecipeConfig {
        &self.config
    }

    fn chain_config(&self) -> &Arc<ChainConfig> {
        &self.chain_config
    }

    fn supports_network(&self, network: Network) -> bool {
        !network.is_testnet() && self.chain_config.network(network).is_ok()
    }

    async fn get_internal_steps(
        &self,
        first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError> {
        let unshielded =
            find_first_input(&first_internal_step_input.erc20_amounts, &self.sell_token)?;
        let sell_amount = match self.sell_amount {
            RequestedAmount::Full => unshielded.expected_balance,
            RequestedAmount::Exact(amount) => amount,
        };

        let params = SwapQuoteParams {
            sell_token: self.sell_token.clone(),
            buy_token: self.buy_token.clone(),
            sell_amount,
            slippage_basis_points: self.slippage_basis_points,
        };
        let quote = with_timeout(
            "0x swap quote",
            EXTERNAL_LOOKUP_TIMEOUT,
            self.quoter
                .quote(first_internal_step_input.network, &params),
        )
        .await?;
        debug!(
            %sell_amount,
            buy_amount = %quote.buy_erc20_amount.amount,
            minimum_buy_amount = %quote.minimum_buy_amount,
            "Fetched swap quote"
        );

        Ok(vec![
            Box::new(ApproveERC20SpenderStep::new(
                quote.spender,
                self.sell_token.clone(),
                Some(quote.sell_token_value),
            )),
            Box::new(ZeroXSwapStep::new(quote, self.sell_token.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use cookbook_common::{
        models::{
            recipe::RecipeInput,
            token::{ERC20Amount, ERC20Balance},
        },
        traits::MockSwapQuoter,
    };

    use super::*;
    use crate::{
        steps::zero_x::tests::{dai, quote},
        testing::{amount, chain_config, weth},
    };

    fn recipe(quoter: MockSwapQuoter, sell_amount: Option<U256>) -> ZeroXSwapRecipe {
        ZeroXSwapRecipe::new(chain_config(), Arc::new(quoter), weth(), dai(), sell_amount, 100)
    }

    fn input() -> RecipeInput {
        RecipeInput::new(Network::Ethereum, vec![ERC20Amount::new(weth(), amount(12000))], vec![])
    }

    #[test_log::test(tokio::test)]
    async fn test_swap_full_balance() {
        let mut quoter = MockSwapQuoter::new();
        quoter
            .expect_quote()
            .withf(|network, params| {
                *network == Network::Ethereum &&
                    params.sell_amount == amount(11970) &&
                    params.slippage_basis_points == 100
            })
            .times(1)
            .returning(|_, _| Ok(quote(11970, 20000, 19800)));

        let output = recipe(quoter, None)
            .get_recipe_output(input())
            .await
            .unwrap();

        let names: Vec<_> = output
            .step_outputs
            .iter()
            .map(|step| step.name.as_str())
            .collect();
        assert_eq!(names, vec!["Unshield", "Approve ERC20 Spender", "0x Exchange Swap", "Shield"]);
        assert_eq!(
            output.step_outputs[3].output_erc20_amounts,
            vec![ERC20Balance::new(dai(), amount(19950)).with_min_balance(amount(19750))]
        );
        assert_eq!(
            output.erc20_amounts,
            vec![ERC20Amount::new(weth(), U256::ZERO), ERC20Amount::new(dai(), amount(19950))]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_quote_failure_is_propagated() {
        let mut quoter = MockSwapQuoter::new();
        quoter
            .expect_quote()
            .returning(|_, _| Err(CookbookError::external("0x swap quote", "insufficient liquidity")));

        let err = recipe(quoter, Some(amount(5000)))
            .get_recipe_output(input())
            .await
            .unwrap_err();

        assert_eq!(err, CookbookError::external("0x swap quote", "insufficient liquidity"));
    }

    #[test]
    fn test_testnets_unsupported() {
        let recipe = recipe(MockSwapQuoter::new(), None);

        assert!(recipe.supports_network(Network::Polygon));
        assert!(!recipe.supports_network(Network::EthereumGoerli));
        assert!(recipe.config().has_non_deterministic_output);
    }
}
