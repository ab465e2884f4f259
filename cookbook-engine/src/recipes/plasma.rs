use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{recipe::RecipeConfig, step::StepInput, Network},
    traits::PlasmaVault,
};
use strum_macros::{Display, EnumString};
use tracing::debug;

use crate::{
    recipe::Recipe,
    step::{matching::find_first_input, Step},
    steps::{
        plasma::plasma_token_info, ApproveERC20SpenderStep, DepositPlasmaTokenStep,
        WithdrawPlasmaTokenStep,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PlasmaAction {
    Wrap,
    Unwrap,
}

/// Moves WETH into the plasma vault (`Wrap`) or redeems plasma tokens for WETH (`Unwrap`).
pub struct PlasmaTokenRecipe {
    config: RecipeConfig,
    chain_config: Arc<ChainConfig>,
    vault: Arc<dyn PlasmaVault>,
    action: PlasmaAction,
    amount: Option<U256>,
}

impl PlasmaTokenRecipe {
    pub fn new(
        chain_config: Arc<ChainConfig>,
        vault: Arc<dyn PlasmaVault>,
        action: PlasmaAction,
        amount: Option<U256>,
    ) -> Self {
        let description = match action {
            PlasmaAction::Wrap => "Wrap WETH into plasma token.",
            PlasmaAction::Unwrap => "Unwrap plasma token into WETH.",
        };
        Self {
            config: RecipeConfig::new(format!("{action} Plasma Token"), description),
            chain_config,
            vault,
            action,
            amount,
        }
    }
}

#[async_trait]
impl Recipe for PlasmaTokenRecipe {
    fn config(&self) -> &RecipeConfig {
        &self.config
    }

    fn chain_config(&self) -> &Arc<ChainConfig> {
        &self.chain_config
    }

    fn supports_network(&self, network: Network) -> bool {
        network == Network::Ethereum &&
            self.chain_config
                .network(network)
                .is_ok_and(|config| config.plasma_token.is_some())
    }

    async fn get_internal_steps(
        &self,
        first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError> {
        let plasma_token = plasma_token_info(&self.chain_config, first_internal_step_input)?;
        let input_token = match self.action {
            PlasmaAction::Wrap => self
                .chain_config
                .network(first_internal_step_input.network)?
                .wrapped_base_token(),
            PlasmaAction::Unwrap => plasma_token.clone(),
        };

        let unshielded = find_first_input(&first_internal_step_input.erc20_amounts, &input_token)?;
        debug!(
            action = %self.action,
            available = %unshielded.expected_balance,
            requested = ?self.amount,
            "Building plasma steps"
        );

        let approve = ApproveERC20SpenderStep::new(
            plasma_token.token_address,
            input_token,
            self.amount,
        );
        let convert: Box<dyn Step> = match self.action {
            PlasmaAction::Wrap => Box::new(DepositPlasmaTokenStep::new(
                self.chain_config.clone(),
                self.vault.clone(),
                self.amount,
            )),
            PlasmaAction::Unwrap => Box::new(WithdrawPlasmaTokenStep::new(
                self.chain_config.clone(),
                self.vault.clone(),
                self.amount,
            )),
        };
        Ok(vec![Box::new(approve), convert])
    }
}
