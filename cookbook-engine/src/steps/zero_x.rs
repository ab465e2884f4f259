use async_trait::async_trait;
use cookbook_common::{
    errors::CookbookError,
    models::{
        step::{StepConfig, StepInput, UnvalidatedStepOutput},
        token::{ERC20AmountRecipient, ERC20Balance, ERC20Info},
    },
    traits::SwapQuote,
};

use crate::step::{
    ledger::consolidate,
    matching::{select_input, ERC20Filter, RequestedAmount},
    Step,
};

/// Executes a pre-fetched 0x quote. The sell token must already be approved for the quote's
/// spender.
pub struct ZeroXSwapStep {
    config: StepConfig,
    quote: SwapQuote,
    sell_token: ERC20Info,
}

impl ZeroXSwapStep {
    pub fn new(quote: SwapQuote, sell_token: ERC20Info) -> Self {
        Self {
            config: StepConfig::new(
                "0x Exchange Swap",
                "Swaps two ERC20 tokens using 0x Exchange DEX Aggregator.",
            )
            .non_deterministic(),
            quote,
            sell_token,
        }
    }
}

#[async_trait]
impl Step for ZeroXSwapStep {
    fn config(&self) -> &StepConfig {
        &self.config
    }

    async fn produce(&self, input: &StepInput) -> Result<UnvalidatedStepOutput, CookbookError> {
        let quote = &self.quote;
        let matched = select_input(
            &self.config.name,
            &input.erc20_amounts,
            &ERC20Filter::token(self.sell_token.clone()).approved_for(quote.spender),
            RequestedAmount::exact(quote.sell_token_value),
        )?;

        let bought = ERC20Balance {
            token: quote.buy_erc20_amount.token.clone(),
            expected_balance: quote.buy_erc20_amount.amount,
            min_balance: quote.minimum_buy_amount,
            approved_spender: None,
        };

        Ok(UnvalidatedStepOutput {
            populated_transactions: vec![quote.populated_transaction.clone()],
            spent_erc20_amounts: vec![ERC20AmountRecipient::new(
                self.sell_token.clone(),
                matched.erc20_amount_for_step.expected_balance,
                "0x Exchange",
            )],
            output_erc20_amounts: consolidate(
                std::iter::once(bought).chain(matched.unused_erc20_amounts),
            ),
            ..Default::default()
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloy_primitives::Address;
    use cookbook_common::models::{step::PopulatedTransaction, token::ERC20Amount, Network};

    use super::*;
    use crate::testing::{amount, weth};

    pub(crate) fn dai() -> ERC20Info {
        ERC20Info::new(Address::with_last_byte(0xda), 18)
    }

    pub(crate) fn exchange_proxy() -> Address {
        Address::with_last_byte(0xef)
    }

    pub(crate) fn quote(sell: u64, buy: u64, minimum: u64) -> SwapQuote {
        SwapQuote {
            sell_token_value: amount(sell),
            buy_erc20_amount: ERC20Amount::new(dai(), amount(buy)),
            minimum_buy_amount: amount(minimum),
            spender: exchange_proxy(),
            populated_transaction: PopulatedTransaction::new(exchange_proxy(), vec![0xd9, 0x62]),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_swap_outputs_min_balance() {
        let step = ZeroXSwapStep::new(quote(10000, 20000, 19800), weth());
        let input = StepInput::new(
            Network::Ethereum,
            vec![ERC20Balance::new(weth(), amount(11970)).approved_for(exchange_proxy())],
            vec![],
        );

        let output = step.run(&input).await.unwrap();

        assert_eq!(
            output.output_erc20_amounts,
            vec![
                ERC20Balance::new(dai(), amount(20000)).with_min_balance(amount(19800)),
                ERC20Balance::new(weth(), amount(1970)).approved_for(exchange_proxy()),
            ]
        );
        assert_eq!(
            output.spent_erc20_amounts,
            vec![ERC20AmountRecipient::new(weth(), amount(10000), "0x Exchange")]
        );
        assert_eq!(output.populated_transactions, vec![quote(0, 0, 0).populated_transaction]);
    }

    #[test_log::test(tokio::test)]
    async fn test_swap_minimum_above_expected_is_invalid() {
        let step = ZeroXSwapStep::new(quote(10000, 20000, 20001), weth());
        let input = StepInput::new(
            Network::Ethereum,
            vec![ERC20Balance::new(weth(), amount(10000)).approved_for(exchange_proxy())],
            vec![],
        );

        let err = step.run(&input).await.unwrap_err();

        assert!(matches!(
            err,
            CookbookError::StepValidation { ref step, .. } if step == "0x Exchange Swap"
        ));
    }
}
