//! Entry and exit brackets of every recipe: moving balances out of and back into the private
//! pool. Both only relabel the ledger and charge the pool fee; the pool calls themselves are built
//! by the caller's wallet.

use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use cookbook_common::{
    config::{fee_for_basis_points, ChainConfig},
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20AmountRecipient, ERC20Balance},
    },
};
use tracing::debug;

use crate::step::{
    ledger::{consolidate, strip_approvals},
    Step,
};

const UNSHIELD_FEE_RECIPIENT: &str = "RAILGUN Unshield Fee";
const SHIELD_FEE_RECIPIENT: &str = "RAILGUN Shield Fee";

/// Deduct a basis point fee from every entry, returning the reduced entries and one fee record
/// per entry.
fn charge_fee(
    entries: Vec<ERC20Balance>,
    basis_points: u64,
    recipient: &str,
) -> Result<(Vec<ERC20Balance>, Vec<ERC20AmountRecipient>), CookbookError> {
    let charged = entries
        .into_iter()
        .map(|entry| {
            let fee = fee_for_basis_points(entry.expected_balance, basis_points)?;
            let record = ERC20AmountRecipient::new(entry.token.clone(), fee, recipient);
            Ok::<_, CookbookError>((entry.residual(fee), record))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(charged.into_iter().unzip())
}

fn bracket_output(
    outputs: Vec<ERC20Balance>,
    fees: Vec<ERC20AmountRecipient>,
) -> UnvalidatedStepOutput {
    UnvalidatedStepOutput {
        output_erc20_amounts: outputs,
        fee_erc20_amount_recipients: Some(fees),
        ..Default::default()
    }
}

pub struct UnshieldDefaultStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
}

impl UnshieldDefaultStep {
    pub fn new(chain_config: Arc<ChainConfig>) -> Self {
        Self {
            config: StepConfig::new("Unshield", "Unshield ERC20s and NFTs from private RAILGUN balance.")
                .without_transactions(),
            chain_config,
        }
    }
}

#[async_trait]
impl Step for UnshieldDefaultStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let basis_points = self
            .chain_config
            .network(input.network)?
            .unshield_fee_basis_points;
        let (outputs, fees) = charge_fee(
            consolidate(input.erc20_amounts.iter().cloned()),
            basis_points,
            UNSHIELD_FEE_RECIPIENT,
        )?;
        debug!(basis_points, tokens = outputs.len(), "Charged unshield fee");
        Ok(bracket_output(outputs, fees))
    }
}

pub struct ShieldDefaultStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
}

impl ShieldDefaultStep {
    pub fn new(chain_config: Arc<ChainConfig>) -> Self {
        Self {
            config: StepConfig::new("Shield", "Shield ERC20s and NFTs into private RAILGUN balance.")
                .without_transactions(),
            chain_config,
        }
    }
}

#[async_trait]
impl Step for ShieldDefaultStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let basis_points = self
            .chain_config
            .network(input.network)?
            .shield_fee_basis_points;
        let entries = consolidate(strip_approvals(input.erc20_amounts.iter().cloned()));
        let (outputs, fees) = charge_fee(entries, basis_points, SHIELD_FEE_RECIPIENT)?;
        let total_fee = fees
            .iter()
            .fold(U256::ZERO, |total, fee| total.saturating_add(fee.amount));
        debug!(basis_points, tokens = outputs.len(), %total_fee, "Charged shield fee");
        Ok(bracket_output(outputs, fees))
    }
}
