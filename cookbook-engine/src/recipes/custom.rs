use std::sync::Arc;

use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{recipe::RecipeConfig, step::StepInput, Network},
};

use crate::{recipe::Recipe, step::Step};

/// A recipe assembled from an explicit list of steps.
///
/// Steps are shared, so the same recipe can be evaluated any number of times.
pub struct CustomRecipe {
    config: RecipeConfig,
    chain_config: Arc<ChainConfig>,
    networks: Vec<Network>,
    steps: Vec<Arc<dyn Step>>,
}

impl CustomRecipe {
    pub fn new(
        config: RecipeConfig,
        chain_config: Arc<ChainConfig>,
        networks: Vec<Network>,
    ) -> Self {
        Self { config, chain_config, networks, steps: Vec::new() }
    }

    pub fn add_step(mut self, step: Arc<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }
}

#[async_trait]
impl Recipe for CustomRecipe {
    fn config(&self) -> &RecipeConfig {
        &self.config
    }

    fn chain_config(&self) -> &Arc<ChainConfig> {
        &self.chain_config
    }

    fn supports_network(&self, network: Network) -> bool {
        self.networks.contains(&network)
    }

    async fn get_internal_steps(
        &self,
        _first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError> {
        Ok(self
            .steps
            .iter()
            .map(|step| Box::new(step.clone()) as Box<dyn Step>)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use cookbook_common::models::{
        recipe::RecipeInput,
        token::{ERC20Amount, ERC20Balance, ERC20Info},
    };

    use super::*;
    use crate::{
        steps::{ERC20Transfer, TransferERC20Step, UnwrapBaseTokenStep},
        testing::{amount, chain_config, WETH_ADDRESS},
    };

    #[test_log::test(tokio::test)]
    async fn test_unwrap_and_transfer() {
        let eth = ERC20Info::base_token(WETH_ADDRESS, 18);
        let weth = ERC20Info::new(WETH_ADDRESS, 18).with_base_token(false);
        let recipient = Address::with_last_byte(0xaa);
        let recipe = CustomRecipe::new(
            RecipeConfig::new("Unwrap and send", "Unwraps WETH and sends ETH."),
            chain_config(),
            vec![Network::Ethereum, Network::Hardhat],
        )
        .add_step(Arc::new(UnwrapBaseTokenStep::new(chain_config(), Some(amount(2000)))))
        .add_step(Arc::new(TransferERC20Step::new(
            chain_config(),
            ERC20Transfer::new(recipient, eth.clone(), None),
        )));
        let input =
            RecipeInput::new(Network::Hardhat, vec![ERC20Amount::new(weth.clone(), amount(12000))], vec![]);

        let first = recipe.get_recipe_output(input.clone()).await.unwrap();
        let second = recipe.get_recipe_output(input).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.populated_transactions.len(), 2);
        assert_eq!(first.step_outputs[2].spent_erc20_amounts[0].amount, amount(2000));
        assert_eq!(
            first.step_outputs[3].output_erc20_amounts,
            vec![ERC20Balance::new(weth.clone(), amount(9946))]
        );
        assert_eq!(
            first.erc20_amounts,
            vec![ERC20Amount::new(weth, amount(9946)), ERC20Amount::new(eth, amount(0))]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_partial_unwrap_of_unflagged_weth() {
        let eth = ERC20Info::base_token(WETH_ADDRESS, 18);
        let weth = ERC20Info::new(WETH_ADDRESS, 18);
        let recipe = CustomRecipe::new(
            RecipeConfig::new("Unwrap", "Unwraps part of the WETH balance."),
            chain_config(),
            vec![Network::Ethereum],
        )
        .add_step(Arc::new(UnwrapBaseTokenStep::new(chain_config(), Some(amount(2000)))));
        let input =
            RecipeInput::new(Network::Ethereum, vec![ERC20Amount::new(weth.clone(), amount(12000))], vec![]);

        let output = recipe.get_recipe_output(input).await.unwrap();

        // 12000 - 30 unshield fee, then 2000 unwrapped; shield fees 24 on 9970 and 5 on 2000
        assert_eq!(
            output.erc20_amounts,
            vec![ERC20Amount::new(weth, amount(9946)), ERC20Amount::new(eth, amount(1995))]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_without_steps_only_brackets_run() {
        let recipe = CustomRecipe::new(RecipeConfig::new("Empty", ""), chain_config(), vec![Network::Ethereum]);
        let input = RecipeInput::new(
            Network::Ethereum,
            vec![ERC20Amount::new(ERC20Info::new(WETH_ADDRESS, 18), amount(12000))],
            vec![],
        );

        let output = recipe.get_recipe_output(input).await.unwrap();

        assert_eq!(output.step_outputs.len(), 2);
        assert!(output.populated_transactions.is_empty());
    }
}
