//! Shared fixtures for engine tests.

use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::ERC20Info,
    },
    traits::MockPlasmaVault,
};

use crate::step::Step;

pub(crate) const WETH_ADDRESS: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

pub(crate) fn weth() -> ERC20Info {
    ERC20Info::new(WETH_ADDRESS, 18)
}

pub(crate) fn plasma_address() -> Address {
    address!("1dbdba33dfa381bcc89fce74dff69aa96b53b503")
}

pub(crate) fn plasma_token() -> ERC20Info {
    ERC20Info::new(plasma_address(), 18)
}

pub(crate) fn relay_adapt_address() -> Address {
    address!("4025ee6512dbbda97049bcf5aa5d38c54af6be8a")
}

pub(crate) fn chain_config() -> Arc<ChainConfig> {
    Arc::new(ChainConfig::mainnet())
}

/// A vault converting shares and assets 1:1.
pub(crate) fn one_to_one_vault() -> MockPlasmaVault {
    let mut vault = MockPlasmaVault::new();
    vault
        .expect_calculate_shares()
        .returning(|_, assets| Ok(assets));
    vault
        .expect_calculate_assets()
        .returning(|_, shares| Ok(shares));
    vault
}

pub(crate) fn amount(value: u64) -> U256 {
    U256::from(value)
}

/// A step that ignores its input and returns a fixed output.
pub(crate) struct StaticStep {
    config: StepConfig,
    output: UnvalidatedStepOutput,
}

impl StaticStep {
    pub(crate) fn new(name: &str, output: UnvalidatedStepOutput) -> Self {
        Self { config: StepConfig::new(name, "Static test step"), output }
    }
}

#[async_trait]
impl Step for StaticStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, _input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        Ok(self.output.clone())
    }
}
