//! Public transfers out of the relay adapt.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20AmountRecipient, ERC20Info},
    },
};
use cookbook_ethereum::relay_adapt::{create_multi_token_transfer, create_token_transfer};
use serde::{Deserialize, Serialize};

use crate::step::{
    matching::{select_input, select_inputs, ERC20Filter, RequestedAmount},
    Step,
};

/// A single public transfer. Without an amount the whole matched balance is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ERC20Transfer {
    pub to_address: Address,
    pub token: ERC20Info,
    #[serde(default)]
    pub amount: Option<U256>,
}

impl ERC20Transfer {
    pub fn new(to_address: Address, token: ERC20Info, amount: Option<U256>) -> Self {
        Self { to_address, token, amount }
    }

    fn requested_amount(&self) -> RequestedAmount {
        self.amount.into()
    }
}

pub struct TransferERC20Step {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    transfer: ERC20Transfer,
}

impl TransferERC20Step {
    pub fn new(chain_config: Arc<ChainConfig>, transfer: ERC20Transfer) -> Self {
        Self {
            config: StepConfig::new(
                "Transfer ERC20",
                "Transfers ERC20 token to an external public address.",
            ),
            chain_config,
            transfer,
        }
    }
}

#[async_trait]
impl Step for TransferERC20Step {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let relay_adapt = self
            .chain_config
            .network(input.network)?
            .relay_adapt(input.network)?;
        let transfer = &self.transfer;
        let amount = transfer.requested_amount();
        let matched = select_input(
            &self.config.name,
            &input.erc20_amounts,
            &ERC20Filter::token(transfer.token.clone()),
            amount,
        )?;

        let token_transfer = create_token_transfer(
            transfer.to_address,
            transfer.token.token_address,
            amount.as_option(),
        );

        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![create_multi_token_transfer(
                relay_adapt,
                vec![token_transfer],
            )],
            spent_erc20_amounts: vec![ERC20AmountRecipient::to_address(
                transfer.token.clone(),
                matched.erc20_amount_for_step.expected_balance,
                &transfer.to_address,
            )],
            output_erc20_amounts: matched.unused_erc20_amounts,
            ..Default::default()
        })
    }
}

/// Several public transfers batched into one relay adapt call.
pub struct TransferERC20TokenMultiStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    transfers: Vec<ERC20Transfer>,
}

impl TransferERC20TokenMultiStep {
    pub fn new(chain_config: Arc<ChainConfig>, transfers: Vec<ERC20Transfer>) -> Self {
        Self {
            config: StepConfig::new(
                "Transfer ERC20 Token Multi",
                "Transfers a set of ERC20 tokens to many external public addresses.",
            ),
            chain_config,
            transfers,
        }
    }
}

#[async_trait]
impl Step for TransferERC20TokenMultiStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let relay_adapt = self
            .chain_config
            .network(input.network)?
            .relay_adapt(input.network)?;

        let requests: Vec<_> = self
            .transfers
            .iter()
            .map(|transfer| {
                (ERC20Filter::token(transfer.token.clone()), transfer.requested_amount())
            })
            .collect();
        let (selected, remaining) =
            select_inputs(&self.config.name, &input.erc20_amounts, &requests)?;

        let token_transfers = self
            .transfers
            .iter()
            .map(|transfer| {
                create_token_transfer(
                    transfer.to_address,
                    transfer.token.token_address,
                    transfer.requested_amount().as_option(),
                )
            })
            .collect();
        let spent_erc20_amounts = self
            .transfers
            .iter()
            .zip(&selected)
            .map(|(transfer, slice)| {
                ERC20AmountRecipient::to_address(
                    transfer.token.clone(),
                    slice.expected_balance,
                    &transfer.to_address,
                )
            })
            .collect();

        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![create_multi_token_transfer(relay_adapt, token_transfers)],
            spent_erc20_amounts,
            output_erc20_amounts: remaining,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolCall;
    use cookbook_common::models::{token::ERC20Balance, Network};
    use cookbook_ethereum::relay_adapt::transferCall;

    use super::*;
    use crate::testing::{amount, chain_config, relay_adapt_address, weth};

    fn usdc() -> ERC20Info {
        ERC20Info::new(Address::with_last_byte(0x12), 6)
    }

    fn input() -> StepInput {
        StepInput::new(
            Network::Ethereum,
            vec![
                ERC20Balance::new(weth(), amount(11970)),
                ERC20Balance::new(usdc(), amount(500)),
            ],
            vec![],
        )
    }

    #[test_log::test(tokio::test)]
    async fn test_transfer_partial_amount() {
        let recipient = Address::with_last_byte(0xaa);
        let step = TransferERC20Step::new(
            chain_config(),
            ERC20Transfer::new(recipient, weth(), Some(amount(10000))),
        );

        let output = step.run(&input()).await.unwrap();

        assert_eq!(
            output.spent_erc20_amounts,
            vec![ERC20AmountRecipient::to_address(weth(), amount(10000), &recipient)]
        );
        assert_eq!(
            output.output_erc20_amounts,
            vec![
                ERC20Balance::new(usdc(), amount(500)),
                ERC20Balance::new(weth(), amount(1970)),
            ]
        );
        assert_eq!(output.populated_transactions[0].to, relay_adapt_address());
    }

    #[test_log::test(tokio::test)]
    async fn test_transfer_without_relay_adapt() {
        let step = TransferERC20Step::new(
            chain_config(),
            ERC20Transfer::new(Address::with_last_byte(0xaa), weth(), None),
        );
        let polygon_input = StepInput { network: Network::Polygon, ..input() };

        let err = step.run(&polygon_input).await.unwrap_err();

        assert!(matches!(err, CookbookError::Configuration(_)));
    }

    #[test_log::test(tokio::test)]
    async fn test_multi_transfer_batches_calls() {
        let first = Address::with_last_byte(0xaa);
        let second = Address::with_last_byte(0xbb);
        let step = TransferERC20TokenMultiStep::new(
            chain_config(),
            vec![
                ERC20Transfer::new(first, weth(), Some(amount(970))),
                ERC20Transfer::new(second, usdc(), None),
                ERC20Transfer::new(second, weth(), Some(amount(1000))),
            ],
        );

        let output = step.run(&input()).await.unwrap();

        assert_eq!(output.populated_transactions.len(), 1);
        let call = transferCall::abi_decode(&output.populated_transactions[0].data, true).unwrap();
        let values: Vec<_> = call
            ._transfers
            .iter()
            .map(|transfer| transfer.value)
            .collect();
        assert_eq!(values, vec![amount(970), U256::ZERO, amount(1000)]);
        assert_eq!(
            output.spent_erc20_amounts,
            vec![
                ERC20AmountRecipient::to_address(weth(), amount(970), &first),
                ERC20AmountRecipient::to_address(usdc(), amount(500), &second),
                ERC20AmountRecipient::to_address(weth(), amount(1000), &second),
            ]
        );
        assert_eq!(output.output_erc20_amounts, vec![ERC20Balance::new(weth(), amount(10000))]);
    }

    #[test_log::test(tokio::test)]
    async fn test_multi_transfer_missing_token() {
        let step = TransferERC20TokenMultiStep::new(
            chain_config(),
            vec![ERC20Transfer::new(
                Address::with_last_byte(0xaa),
                ERC20Info::new(Address::with_last_byte(0x34), 18),
                None,
            )],
        );

        let err = step.run(&input()).await.unwrap_err();

        assert!(err
            .to_string()
            .contains("0x0000000000000000000000000000000000000034"));
    }
}
