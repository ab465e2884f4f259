use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use cookbook_common::{
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::ERC20Info,
    },
};
use cookbook_ethereum::erc20::create_spender_approval;

use crate::step::{
    matching::{select_input, ERC20Filter, RequestedAmount},
    Step,
};

/// Approves a contract to pull a token from the relay adapt.
///
/// The approved slice becomes its own ledger entry tagged with the spender; whatever is not
/// approved stays a separate, unapproved entry.
pub struct ApproveERC20SpenderStep {
    config: StepConfig,
    spender: Address,
    token: ERC20Info,
    amount: RequestedAmount,
}

impl ApproveERC20SpenderStep {
    pub fn new(spender: Address, token: ERC20Info, amount: Option<U256>) -> Self {
        Self {
            config: StepConfig::new("Approve ERC20 Spender", "Approves ERC20 for spender contract."),
            spender,
            token,
            amount: amount.into(),
        }
    }
}

#[async_trait]
impl Step for ApproveERC20SpenderStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let matched = select_input(
            &self.config.name,
            &input.erc20_amounts,
            &ERC20Filter::token(self.token.clone()),
            self.amount,
        )?;
        let approved = matched
            .erc20_amount_for_step
            .approved_for(self.spender);

        let transaction = create_spender_approval(
            self.token.token_address,
            self.spender,
            approved.expected_balance,
        );

        let mut output_erc20_amounts = vec![approved];
        output_erc20_amounts.extend(matched.unused_erc20_amounts);

        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![transaction],
            output_erc20_amounts,
            ..Default::default()
        })
    }
}
