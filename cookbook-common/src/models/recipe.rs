use serde::{Deserialize, Serialize};

use crate::models::{
    step::{PopulatedTransaction, StepInput, StepOutput},
    token::{ERC20Amount, ERC20AmountRecipient, ERC20Balance, NFTInfo},
    Network,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeConfig {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub has_non_deterministic_output: bool,
}

impl RecipeConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), has_non_deterministic_output: false }
    }

    pub fn non_deterministic(mut self) -> Self {
        self.has_non_deterministic_output = true;
        self
    }
}

/// The private balances a recipe starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInput {
    pub network: Network,
    pub erc20_amounts: Vec<ERC20Amount>,
    #[serde(default)]
    pub nfts: Vec<NFTInfo>,
}

impl RecipeInput {
    pub fn new(network: Network, erc20_amounts: Vec<ERC20Amount>, nfts: Vec<NFTInfo>) -> Self {
        Self { network, erc20_amounts, nfts }
    }
}

impl From<RecipeInput> for StepInput {
    fn from(value: RecipeInput) -> Self {
        StepInput {
            network: value.network,
            erc20_amounts: value
                .erc20_amounts
                .into_iter()
                .map(ERC20Balance::from)
                .collect(),
            nfts: value.nfts,
        }
    }
}

/// Aggregated result of a whole recipe, bracket steps included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeOutput {
    pub name: String,
    pub description: String,
    pub step_outputs: Vec<StepOutput>,
    /// Every token seen in the pipeline, in order of first appearance, with its final balance.
    pub erc20_amounts: Vec<ERC20Amount>,
    pub nfts: Vec<NFTInfo>,
    pub fee_erc20_amount_recipients: Vec<ERC20AmountRecipient>,
    pub populated_transactions: Vec<PopulatedTransaction>,
}
