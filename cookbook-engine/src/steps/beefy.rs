use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use cookbook_common::{
    config::fee_for_basis_points,
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20AmountRecipient, ERC20Balance, ERC20Info},
        Network,
    },
};
use cookbook_ethereum::beefy::create_deposit_all;
use serde::{Deserialize, Serialize};

use crate::step::{
    ledger::consolidate,
    matching::{select_input, ERC20Filter, RequestedAmount},
    Step,
};

/// A Beefy vault as listed by the Beefy API.
///
/// `vault_rate` is the price of one vault token in deposit tokens, scaled by
/// `10^deposit_erc20_decimals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeefyVaultData {
    pub vault_id: String,
    pub vault_name: String,
    pub network: Network,
    pub deposit_erc20_address: Address,
    pub deposit_erc20_decimals: u8,
    pub vault_contract_address: Address,
    pub vault_token_address: Address,
    pub vault_rate: U256,
    pub deposit_fee_basis_points: u64,
}

impl BeefyVaultData {
    pub fn deposit_token(&self) -> ERC20Info {
        ERC20Info::new(self.deposit_erc20_address, self.deposit_erc20_decimals)
    }

    pub fn vault_token(&self) -> ERC20Info {
        ERC20Info::new(self.vault_token_address, self.deposit_erc20_decimals)
    }
}

/// Amounts resulting from depositing into a Beefy vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeefyDepositAmounts {
    pub deposit_fee_amount: U256,
    pub deposit_amount_after_fee: U256,
    pub received_vault_token_amount: U256,
}

pub fn calculate_outputs_for_beefy_deposit(
    amount: U256,
    vault: &BeefyVaultData,
) -> Result<BeefyDepositAmounts, CookbookError> {
    if vault.vault_rate.is_zero() {
        return Err(CookbookError::Configuration(format!(
            "Beefy vault {} has a zero vault rate",
            vault.vault_id
        )));
    }
    let deposit_fee_amount = fee_for_basis_points(amount, vault.deposit_fee_basis_points)?;
    let deposit_amount_after_fee = amount.saturating_sub(deposit_fee_amount);
    let decimals_adjustment = U256::from(10u64).pow(U256::from(vault.deposit_erc20_decimals));
    let received_vault_token_amount = deposit_amount_after_fee
        .checked_mul(decimals_adjustment)
        .ok_or_else(|| {
            CookbookError::Overflow(format!("{deposit_amount_after_fee} scaled to vault {}", vault.vault_id))
        })? /
        vault.vault_rate;

    Ok(BeefyDepositAmounts {
        deposit_fee_amount,
        deposit_amount_after_fee,
        received_vault_token_amount,
    })
}

pub struct BeefyDepositStep {
    config: StepConfig,
    vault: BeefyVaultData,
}

impl BeefyDepositStep {
    pub fn new(vault: BeefyVaultData) -> Self {
        Self {
            config: StepConfig::new(
                "Beefy Vault Deposit",
                "Deposits into a yield-bearing Beefy Vault.",
            ),
            vault,
        }
    }
}

#[async_trait]
impl Step for BeefyDepositStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let vault = &self.vault;
        let deposit_token = vault.deposit_token();
        let matched = select_input(
            &self.config.name,
            &input.erc20_amounts,
            &ERC20Filter::token(deposit_token.clone()).approved_for(vault.vault_contract_address),
            RequestedAmount::Full,
        )?;

        let deposit = &matched.erc20_amount_for_step;
        let amounts = calculate_outputs_for_beefy_deposit(deposit.expected_balance, vault)?;
        let min_received = calculate_outputs_for_beefy_deposit(deposit.min_balance, vault)?
            .received_vault_token_amount
            .min(amounts.received_vault_token_amount);
        let received = ERC20Balance::new(vault.vault_token(), amounts.received_vault_token_amount)
            .with_min_balance(min_received);

        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![create_deposit_all(vault.vault_contract_address)],
            spent_erc20_amounts: vec![ERC20AmountRecipient::new(
                deposit_token.clone(),
                amounts.deposit_amount_after_fee,
                format!("{} Vault", vault.vault_name),
            )],
            output_erc20_amounts: consolidate(
                std::iter::once(received).chain(matched.unused_erc20_amounts),
            ),
            fee_erc20_amount_recipients: Some(vec![ERC20AmountRecipient::new(
                deposit_token,
                amounts.deposit_fee_amount,
                format!("{} Vault Deposit Fee", vault.vault_name),
            )]),
            ..Default::default()
        })
    }
}
