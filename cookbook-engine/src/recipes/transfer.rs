use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{recipe::RecipeConfig, step::StepInput, token::ERC20Info, Network},
    traits::TokenMetadataProvider,
};
use futures03::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    lookup::{with_timeout, EXTERNAL_LOOKUP_TIMEOUT},
    recipe::Recipe,
    step::Step,
    steps::{ERC20Transfer, TransferERC20TokenMultiStep},
};

/// A transfer whose token decimals may still be unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to_address: Address,
    pub token_address: Address,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub amount: Option<U256>,
}

/// Unshields tokens and sends them to public addresses in one batched call.
pub struct UnshieldMultiTransferRecipe {
    config: RecipeConfig,
    chain_config: Arc<ChainConfig>,
    metadata: Arc<dyn TokenMetadataProvider>,
    transfers: Vec<ERC20Transfer>,
}

impl UnshieldMultiTransferRecipe {
    pub fn new(
        chain_config: Arc<ChainConfig>,
        metadata: Arc<dyn TokenMetadataProvider>,
        transfers: Vec<ERC20Transfer>,
    ) -> Self {
        Self {
            config: RecipeConfig::new(
                "Unshield Multi-Transfer Recipe",
                "Unshields tokens and transfers them to multiple public addresses.",
            ),
            chain_config,
            metadata,
            transfers,
        }
    }

    pub fn transfers(&self) -> &[ERC20Transfer] {
        &self.transfers
    }

    /// Resolve the request's token and queue the transfer.
    pub async fn add_transfer(
        &mut self,
        network: Network,
        request: TransferRequest,
    ) -> Result<(), CookbookError> {
        let transfer = self.resolve(network, request).await?;
        self.transfers.push(transfer);
        Ok(())
    }

    /// Resolve several requests concurrently. Either every transfer is queued or none is.
    pub async fn add_transfers(
        &mut self,
        network: Network,
        requests: Vec<TransferRequest>,
    ) -> Result<(), CookbookError> {
        let lookups = requests
            .into_iter()
            .map(|request| self.resolve(network, request));
        let transfers = try_join_all(lookups).await?;
        self.transfers.extend(transfers);
        Ok(())
    }

    async fn resolve(
        &self,
        network: Network,
        request: TransferRequest,
    ) -> Result<ERC20Transfer, CookbookError> {
        let decimals = match request.decimals {
            Some(decimals) => decimals,
            None => {
                let context = format!("decimals of {:#x}", request.token_address);
                let decimals = with_timeout(
                    &context,
                    EXTERNAL_LOOKUP_TIMEOUT,
                    self.metadata
                        .decimals(network, request.token_address),
                )
                .await?;
                debug!(token = %request.token_address, decimals, "Resolved token decimals");
                decimals
            }
        };
        Ok(ERC20Transfer::new(
            request.to_address,
            ERC20Info::new(request.token_address, decimals),
            request.amount,
        ))
    }
}

#[async_trait]
impl Recipe for UnshieldMultiTransferRecipe {
    fn config(&self) -> &RecipeConfig {
        &self.config
    }

    fn chain_config(&self) -> &Arc<ChainConfig> {
        &self.chain_config
    }

    fn supports_network(&self, _network: Network) -> bool {
        true
    }

    async fn get_internal_steps(
        &self,
        _first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError> {
        if self.transfers.is_empty() {
            return Err(CookbookError::Configuration(
                "There are no transfers added to the recipe.".to_string(),
            ));
        }
        Ok(vec![Box::new(TransferERC20TokenMultiStep::new(
            self.chain_config.clone(),
            self.transfers.clone(),
        ))])
    }
}
