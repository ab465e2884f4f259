use std::sync::Arc;

use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{recipe::RecipeConfig, step::StepInput, Network},
};

use crate::{
    recipe::Recipe,
    step::{matching::find_first_input, Step},
    steps::{ApproveERC20SpenderStep, BeefyDepositStep, BeefyVaultData},
};

pub struct BeefyDepositRecipe {
    config: RecipeConfig,
    chain_config: Arc<ChainConfig>,
    vault: BeefyVaultData,
}

impl BeefyDepositRecipe {
    pub fn new(chain_config: Arc<ChainConfig>, vault: BeefyVaultData) -> Self {
        Self {
            config: RecipeConfig::new(
                format!("Beefy Vault Deposit: {}", vault.vault_name),
                "Deposits into a yield-bearing Beefy Vault.",
            ),
            chain_config,
            vault,
        }
    }
}

#[async_trait]
impl Recipe for BeefyDepositRecipe {
    fn config(&self) -> &RecipeConfig {
        &self.config
    }

    fn chain_config(&self) -> &Arc<ChainConfig> {
        &self.chain_config
    }

    fn supports_network(&self, network: Network) -> bool {
        self.vault.network == network
    }

    async fn get_internal_steps(
        &self,
        first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError> {
        let deposit_token = self.vault.deposit_token();
        find_first_input(&first_internal_step_input.erc20_amounts, &deposit_token)?;

        Ok(vec![
            Box::new(ApproveERC20SpenderStep::new(
                self.vault.vault_contract_address,
                deposit_token,
                None,
            )),
            Box::new(BeefyDepositStep::new(self.vault.clone())),
        ])
    }
}
