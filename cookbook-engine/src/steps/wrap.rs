//! Conversions between a network's base token and its wrapped ERC20, via the relay adapt.

use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        step::{PopulatedTransaction, StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20Balance, ERC20Info},
    },
};
use cookbook_ethereum::relay_adapt::{create_base_token_unwrap, create_base_token_wrap};

use crate::step::{
    ledger::consolidate,
    matching::{select_input, ERC20Filter, RequestedAmount},
    Step,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Wrap,
    Unwrap,
}

/// Shared body of both directions: consume `from`, relabel the slice as `to`.
fn convert(
    config: &StepConfig,
    chain_config: &ChainConfig,
    direction: Direction,
    amount: RequestedAmount,
    input: &StepInput,
) -> Result<UnvalidatedStepOutput, CookbookError> {
    let network = chain_config.network(input.network)?;
    let relay_adapt = network.relay_adapt(input.network)?;
    let (from, to): (ERC20Info, ERC20Info) = match direction {
        Direction::Wrap => (network.base_token(), network.wrapped_base_token()),
        Direction::Unwrap => (network.wrapped_base_token(), network.base_token()),
    };

    let matched = select_input(&config.name, &input.erc20_amounts, &ERC20Filter::token(from), amount)?;
    let slice = matched.erc20_amount_for_step;

    let transaction: PopulatedTransaction = match direction {
        Direction::Wrap => create_base_token_wrap(relay_adapt, amount.as_option()),
        Direction::Unwrap => create_base_token_unwrap(relay_adapt, amount.as_option()),
    };
    let converted = ERC20Balance {
        token: to,
        expected_balance: slice.expected_balance,
        min_balance: slice.min_balance,
        approved_spender: None,
    };

    Ok(UnvalidatedStepOutput {
        populated_transactions: vec![transaction],
        output_erc20_amounts: consolidate(
            std::iter::once(converted).chain(matched.unused_erc20_amounts),
        ),
        ..Default::default()
    })
}

pub struct WrapBaseTokenStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    amount: RequestedAmount,
}

impl WrapBaseTokenStep {
    pub fn new(chain_config: Arc<ChainConfig>, amount: Option<U256>) -> Self {
        Self {
            config: StepConfig::new(
                "Wrap Base Token",
                "Wraps base token into wrapped token, ie ETH to WETH.",
            ),
            chain_config,
            amount: amount.into(),
        }
    }
}

#[async_trait]
impl Step for WrapBaseTokenStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        convert(&self.config, &self.chain_config, Direction::Wrap, self.amount, input)
    }
}

pub struct UnwrapBaseTokenStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    amount: RequestedAmount,
}

impl UnwrapBaseTokenStep {
    pub fn new(chain_config: Arc<ChainConfig>, amount: Option<U256>) -> Self {
        Self {
            config: StepConfig::new(
                "Unwrap Base Token",
                "Unwraps wrapped token into base token, ie WETH to ETH.",
            ),
            chain_config,
            amount: amount.into(),
        }
    }
}

#[async_trait]
impl Step for UnwrapBaseTokenStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        convert(&self.config, &self.chain_config, Direction::Unwrap, self.amount, input)
    }
}
