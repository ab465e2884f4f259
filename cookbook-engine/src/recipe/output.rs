//! Folding step outputs into a [`RecipeOutput`].

use alloy_primitives::{Address, U256};
use cookbook_common::models::{
    recipe::{RecipeConfig, RecipeOutput},
    step::StepOutput,
    token::{ERC20Amount, ERC20AmountRecipient, ERC20Info},
};
use tracing::debug;

/// Per token totals of the fees charged across a recipe, in order of first appearance.
#[derive(Debug, Default)]
struct FeeTotals {
    totals: Vec<(Address, U256)>,
}

impl FeeTotals {
    fn add(&mut self, fee: &ERC20AmountRecipient) {
        let token = fee.token.token_address;
        match self
            .totals
            .iter_mut()
            .find(|(existing, _)| *existing == token)
        {
            Some((_, total)) => *total = total.saturating_add(fee.amount),
            None => self.totals.push((token, fee.amount)),
        }
    }
}

/// Every token identity seen in any output ledger, in order of first appearance.
fn seen_tokens(step_outputs: &[StepOutput]) -> Vec<ERC20Info> {
    let mut seen: Vec<ERC20Info> = Vec::new();
    for entry in step_outputs
        .iter()
        .flat_map(|output| &output.output_erc20_amounts)
    {
        if !seen
            .iter()
            .any(|token| token.same_token(&entry.token))
        {
            seen.push(entry.token.clone());
        }
    }
    seen
}

pub fn assemble_recipe_output(config: &RecipeConfig, step_outputs: Vec<StepOutput>) -> RecipeOutput {
    let final_ledger = step_outputs
        .last()
        .map(|output| output.output_erc20_amounts.as_slice())
        .unwrap_or_default();
    let erc20_amounts = seen_tokens(&step_outputs)
        .into_iter()
        .map(|token| {
            let amount = final_ledger
                .iter()
                .filter(|entry| entry.token.same_token(&token))
                .fold(U256::ZERO, |total, entry| total.saturating_add(entry.expected_balance));
            ERC20Amount::new(token, amount)
        })
        .collect();
    let nfts = step_outputs
        .last()
        .map(|output| output.output_nfts.clone())
        .unwrap_or_default();

    let fee_erc20_amount_recipients: Vec<_> = step_outputs
        .iter()
        .flat_map(|output| output.fee_erc20_amount_recipients.iter().cloned())
        .collect();
    let mut fee_totals = FeeTotals::default();
    fee_erc20_amount_recipients
        .iter()
        .for_each(|fee| fee_totals.add(fee));
    for (token, total) in &fee_totals.totals {
        debug!(recipe = %config.name, token = %token, %total, "Recipe fee total");
    }

    let populated_transactions = step_outputs
        .iter()
        .flat_map(|output| output.populated_transactions.iter().cloned())
        .collect();

    RecipeOutput {
        name: config.name.clone(),
        description: config.description.clone(),
        step_outputs,
        erc20_amounts,
        nfts,
        fee_erc20_amount_recipients,
        populated_transactions,
    }
}
