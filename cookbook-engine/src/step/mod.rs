//! The step contract.
//!
//! A step only implements [`Step::produce`]: its protocol logic. [`Step::run`] wraps it with the
//! shared normalisation and validation so no step can hand an inconsistent ledger to the next one.

pub mod ledger;
pub mod matching;
mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use cookbook_common::{
    errors::CookbookError,
    models::step::{StepConfig, StepInput, StepOutput, UnvalidatedStepOutput},
};
use tracing::{debug, instrument};

pub use validation::validate_step_output;

#[async_trait]
pub trait Step: Send + Sync {
    fn config(&self) -> &StepConfig;

    /// Build the step's calls and its resulting ledger from `input`.
    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError>;

    /// Run the step and validate what it produced.
    async fn run(&self, input: &StepInput) -> Result<StepOutput, CookbookError> {
        run_step(self, input).await
    }
}

#[async_trait]
impl<S: Step + ?Sized> Step for Arc<S> {
    fn config(&self) -> &StepConfig {
        (**self).config()
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        (**self).produce(input).await
    }
}

#[instrument(skip_all, fields(step = %step.config().name, network = %input.network))]
async fn run_step<S: Step + ?Sized>(
    step: &S,
    input: &StepInput,
) -> Result<StepOutput, CookbookError> {
    let config = step.config();
    let unvalidated = step.produce(input).await?;
    let output = StepOutput {
        name: config.name.clone(),
        description: config.description.clone(),
        spent_erc20_amounts: unvalidated.spent_erc20_amounts,
        output_erc20_amounts: unvalidated.output_erc20_amounts,
        spent_nfts: unvalidated.spent_nfts.unwrap_or_default(),
        output_nfts: unvalidated
            .output_nfts
            .unwrap_or_else(|| input.nfts.clone()),
        fee_erc20_amount_recipients: unvalidated
            .fee_erc20_amount_recipients
            .unwrap_or_default(),
        populated_transactions: unvalidated.populated_transactions,
    };
    validate_step_output(config, &output)?;
    debug!(
        outputs = output.output_erc20_amounts.len(),
        transactions = output.populated_transactions.len(),
        "Step produced valid output"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use cookbook_common::models::{
        step::PopulatedTransaction,
        token::{ERC20Balance, NFTInfo, NFTTokenType},
        Network,
    };

    use super::*;
    use crate::{
        steps::ApproveERC20SpenderStep,
        testing::{weth, StaticStep},
    };

    fn input() -> StepInput {
        StepInput::new(
            Network::Ethereum,
            vec![ERC20Balance::new(weth(), U256::from(100))],
            vec![NFTInfo::new(Address::with_last_byte(9), U256::from(1), NFTTokenType::ERC721)],
        )
    }

    #[test_log::test(tokio::test)]
    async fn test_run_defaults_nfts_to_input() {
        let step = StaticStep::new(
            "Static",
            UnvalidatedStepOutput {
                populated_transactions: vec![PopulatedTransaction::new(Address::ZERO, vec![1u8])],
                output_erc20_amounts: vec![ERC20Balance::new(weth(), U256::from(100))],
                ..Default::default()
            },
        );

        let output = step.run(&input()).await.unwrap();

        assert_eq!(output.name, "Static");
        assert_eq!(output.output_nfts, input().nfts);
        assert!(output.spent_nfts.is_empty());
        assert!(output.fee_erc20_amount_recipients.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_run_rejects_min_above_expected() {
        let step = StaticStep::new(
            "Broken",
            UnvalidatedStepOutput {
                populated_transactions: vec![PopulatedTransaction::new(Address::ZERO, vec![1u8])],
                output_erc20_amounts: vec![
                    ERC20Balance::new(weth(), U256::from(100)).with_min_balance(U256::from(101))
                ],
                ..Default::default()
            },
        );

        let err = step.run(&input()).await.unwrap_err();

        assert!(matches!(err, CookbookError::StepValidation { ref step, .. } if step == "Broken"));
    }

    #[test_log::test(tokio::test)]
    async fn test_identically_built_steps_agree() {
        let build = || {
            Arc::new(ApproveERC20SpenderStep::new(
                Address::with_last_byte(0x42),
                weth(),
                Some(U256::from(60)),
            ))
        };
        let first_step = build();
        let second_step = build();

        let first = first_step.run(&input()).await.unwrap();
        let second = second_step.clone().run(&input()).await.unwrap();
        let repeated = first_step.run(&input()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, repeated);
    }
}
