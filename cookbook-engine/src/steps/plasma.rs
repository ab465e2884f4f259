//! Plasma token vault: WETH in, interest-bearing plasma shares out, and back.

use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20AmountRecipient, ERC20Balance, ERC20Info},
        Network,
    },
    traits::PlasmaVault,
};
use cookbook_ethereum::plasma::{create_deposit, create_withdraw};
use tracing::debug;

use crate::{
    lookup::{with_timeout, EXTERNAL_LOOKUP_TIMEOUT},
    step::{
        ledger::consolidate,
        matching::{select_input, ERC20Filter, RequestedAmount},
        Step,
    },
};

/// The plasma share token of `network`, sharing the wrapped base token's decimals.
pub(crate) fn plasma_token_info(
    chain_config: &ChainConfig,
    input: &StepInput,
) -> Result<ERC20Info, CookbookError> {
    let network = chain_config.network(input.network)?;
    let plasma = network.plasma(input.network)?;
    Ok(ERC20Info::new(plasma, network.base_token.decimals).with_base_token(false))
}

#[derive(Debug, Clone, Copy)]
enum Conversion {
    AssetsToShares,
    SharesToAssets,
}

async fn vault_convert(
    vault: &dyn PlasmaVault,
    network: Network,
    conversion: Conversion,
    value: U256,
) -> Result<U256, CookbookError> {
    match conversion {
        Conversion::AssetsToShares => {
            with_timeout(
                "plasma share conversion",
                EXTERNAL_LOOKUP_TIMEOUT,
                vault.calculate_shares(network, value),
            )
            .await
        }
        Conversion::SharesToAssets => {
            with_timeout(
                "plasma asset conversion",
                EXTERNAL_LOOKUP_TIMEOUT,
                vault.calculate_assets(network, value),
            )
            .await
        }
    }
}

/// Convert both balances of `entry`. The minimum is only looked up when it differs from the
/// expected balance, and never exceeds the converted expected balance.
async fn convert_entry(
    vault: &dyn PlasmaVault,
    network: Network,
    conversion: Conversion,
    entry: &ERC20Balance,
) -> Result<(U256, U256), CookbookError> {
    let expected = vault_convert(vault, network, conversion, entry.expected_balance).await?;
    if entry.min_balance == entry.expected_balance {
        return Ok((expected, expected));
    }
    let minimum = vault_convert(vault, network, conversion, entry.min_balance).await?;
    Ok((expected, minimum.min(expected)))
}

pub struct DepositPlasmaTokenStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    vault: Arc<dyn PlasmaVault>,
    amount: RequestedAmount,
}

impl DepositPlasmaTokenStep {
    pub fn new(
        chain_config: Arc<ChainConfig>,
        vault: Arc<dyn PlasmaVault>,
        amount: Option<U256>,
    ) -> Self {
        Self {
            config: StepConfig::new(
                "Deposit PlasmaToken",
                "Wraps WETH for Plasma Token. This deposit earns rewards on flashLending fees.",
            ),
            chain_config,
            vault,
            amount: amount.into(),
        }
    }
}

#[async_trait]
impl Step for DepositPlasmaTokenStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let plasma_token = plasma_token_info(&self.chain_config, input)?;
        let plasma = plasma_token.token_address;
        let weth = self
            .chain_config
            .network(input.network)?
            .wrapped_base_token();

        let matched = select_input(
            &self.config.name,
            &input.erc20_amounts,
            &ERC20Filter::token(weth).approved_for(plasma),
            self.amount,
        )?;
        let deposit = matched.erc20_amount_for_step;

        let (shares, min_shares) =
            convert_entry(self.vault.as_ref(), input.network, Conversion::AssetsToShares, &deposit)
                .await?;
        debug!(assets = %deposit.expected_balance, %shares, %min_shares, "Converted plasma deposit");

        let minted = ERC20Balance::new(plasma_token, shares).with_min_balance(min_shares);
        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![create_deposit(plasma, deposit.expected_balance, shares)],
            spent_erc20_amounts: vec![ERC20AmountRecipient::to_address(
                deposit.token,
                deposit.expected_balance,
                &plasma,
            )],
            output_erc20_amounts: consolidate(
                std::iter::once(minted).chain(matched.unused_erc20_amounts),
            ),
            ..Default::default()
        })
    }
}

pub struct WithdrawPlasmaTokenStep {
    config: StepConfig,
    chain_config: Arc<ChainConfig>,
    vault: Arc<dyn PlasmaVault>,
    amount: RequestedAmount,
}

impl WithdrawPlasmaTokenStep {
    pub fn new(
        chain_config: Arc<ChainConfig>,
        vault: Arc<dyn PlasmaVault>,
        amount: Option<U256>,
    ) -> Self {
        Self {
            config: StepConfig::new(
                "Withdraw PlasmaToken",
                "Unwraps Plasma for WETH. This withdraw earns rewards on flashLending fees.",
            ),
            chain_config,
            vault,
            amount: amount.into(),
        }
    }
}

#[async_trait]
impl Step for WithdrawPlasmaTokenStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let plasma_token = plasma_token_info(&self.chain_config, input)?;
        let plasma = plasma_token.token_address;
        let weth = self
            .chain_config
            .network(input.network)?
            .wrapped_base_token();

        let matched = select_input(
            &self.config.name,
            &input.erc20_amounts,
            &ERC20Filter::token(plasma_token).approved_for(plasma),
            self.amount,
        )?;
        let burned = matched.erc20_amount_for_step;

        let (assets, min_assets) =
            convert_entry(self.vault.as_ref(), input.network, Conversion::SharesToAssets, &burned)
                .await?;
        debug!(shares = %burned.expected_balance, %assets, %min_assets, "Converted plasma withdrawal");

        let redeemed = ERC20Balance::new(weth, assets).with_min_balance(min_assets);
        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![create_withdraw(plasma, burned.expected_balance, assets)],
            spent_erc20_amounts: vec![ERC20AmountRecipient::to_address(
                burned.token,
                burned.expected_balance,
                &plasma,
            )],
            output_erc20_amounts: consolidate(
                std::iter::once(redeemed).chain(matched.unused_erc20_amounts),
            ),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use cookbook_common::{models::Network, traits::MockPlasmaVault};

    use super::*;
    use crate::testing::{amount, chain_config, one_to_one_vault, plasma_address, plasma_token, weth};

    fn approved_weth(balance: u64) -> ERC20Balance {
        ERC20Balance::new(weth(), amount(balance)).approved_for(plasma_address())
    }

    #[test_log::test(tokio::test)]
    async fn test_deposit_encodes_amount_and_shares() {
        let step =
            DepositPlasmaTokenStep::new(chain_config(), Arc::new(one_to_one_vault()), None);
        let input = StepInput::new(
            Network::Ethereum,
            vec![approved_weth(10000), ERC20Balance::new(weth(), amount(1970))],
            vec![],
        );

        let output = step.run(&input).await.unwrap();

        assert_eq!(
            hex::encode(&output.populated_transactions[0].data),
            "e2bbb158\
             0000000000000000000000000000000000000000000000000000000000002710\
             0000000000000000000000000000000000000000000000000000000000002710"
        );
        assert_eq!(output.populated_transactions[0].to, plasma_address());
        assert_eq!(
            output.output_erc20_amounts,
            vec![
                ERC20Balance::new(plasma_token().with_base_token(false), amount(10000)),
                ERC20Balance::new(weth(), amount(1970)),
            ]
        );
        assert_eq!(
            output.spent_erc20_amounts,
            vec![ERC20AmountRecipient::to_address(weth(), amount(10000), &plasma_address())]
        );
        assert!(output.fee_erc20_amount_recipients.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_deposit_uses_vault_conversion() {
        let mut vault = MockPlasmaVault::new();
        vault
            .expect_calculate_shares()
            .withf(|network, assets| *network == Network::Ethereum && *assets == amount(10000))
            .times(1)
            .returning(|_, _| Ok(amount(9500)));
        let step = DepositPlasmaTokenStep::new(chain_config(), Arc::new(vault), None);
        let input = StepInput::new(Network::Ethereum, vec![approved_weth(10000)], vec![]);

        let output = step.run(&input).await.unwrap();

        assert_eq!(output.output_erc20_amounts[0].expected_balance, amount(9500));
    }

    #[test_log::test(tokio::test)]
    async fn test_deposit_carries_minimum_through_vault() {
        let mut vault = MockPlasmaVault::new();
        vault
            .expect_calculate_shares()
            .withf(|_, assets| *assets == amount(10000))
            .times(1)
            .returning(|_, _| Ok(amount(9500)));
        vault
            .expect_calculate_shares()
            .withf(|_, assets| *assets == amount(9000))
            .times(1)
            .returning(|_, _| Ok(amount(8550)));
        let step = DepositPlasmaTokenStep::new(chain_config(), Arc::new(vault), None);
        let swapped = ERC20Balance::new(weth(), amount(10000))
            .with_min_balance(amount(9000))
            .approved_for(plasma_address());
        let input = StepInput::new(Network::Ethereum, vec![swapped], vec![]);

        let output = step.run(&input).await.unwrap();

        assert_eq!(
            output.output_erc20_amounts,
            vec![ERC20Balance::new(plasma_token().with_base_token(false), amount(9500))
                .with_min_balance(amount(8550))]
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_deposit_requires_approval() {
        let step =
            DepositPlasmaTokenStep::new(chain_config(), Arc::new(MockPlasmaVault::new()), None);
        let input =
            StepInput::new(Network::Ethereum, vec![ERC20Balance::new(weth(), amount(10000))], vec![]);

        let err = step.run(&input).await.unwrap_err();

        assert!(err
            .to_string()
            .ends_with("approved for spender 0x1dbdba33dfa381bcc89fce74dff69aa96b53b503"));
    }

    #[test_log::test(tokio::test)]
    async fn test_deposit_vault_error_is_propagated() {
        let mut vault = MockPlasmaVault::new();
        vault
            .expect_calculate_shares()
            .returning(|_, _| Err(CookbookError::external("totalSupply", "execution reverted")));
        let step = DepositPlasmaTokenStep::new(chain_config(), Arc::new(vault), None);
        let input = StepInput::new(Network::Ethereum, vec![approved_weth(10000)], vec![]);

        let err = step.run(&input).await.unwrap_err();

        assert_eq!(err, CookbookError::external("totalSupply", "execution reverted"));
    }

    #[test_log::test(tokio::test)]
    async fn test_withdraw_partial() {
        let step = WithdrawPlasmaTokenStep::new(
            chain_config(),
            Arc::new(one_to_one_vault()),
            Some(amount(4000)),
        );
        let approved_plasma =
            ERC20Balance::new(plasma_token(), amount(10000)).approved_for(plasma_address());
        let input = StepInput::new(Network::Ethereum, vec![approved_plasma], vec![]);

        let output = step.run(&input).await.unwrap();

        assert_eq!(
            output.output_erc20_amounts,
            vec![
                ERC20Balance::new(weth().with_base_token(false), amount(4000)),
                ERC20Balance::new(plasma_token(), amount(6000)).approved_for(plasma_address()),
            ]
        );
        assert_eq!(output.spent_erc20_amounts[0].amount, amount(4000));
    }

    #[test_log::test(tokio::test)]
    async fn test_plasma_not_deployed() {
        let step =
            DepositPlasmaTokenStep::new(chain_config(), Arc::new(MockPlasmaVault::new()), None);
        let input = StepInput::new(Network::Polygon, vec![approved_weth(10000)], vec![]);

        let err = step.run(&input).await.unwrap_err();

        assert!(matches!(err, CookbookError::Configuration(_)));
    }
}
