use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::models::{
    token::{ERC20AmountRecipient, ERC20Balance, NFTInfo, NFTRecipient},
    Network,
};

/// An opaque contract call: destination plus ABI encoded call data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulatedTransaction {
    pub to: Address,
    pub data: Bytes,
}

impl PopulatedTransaction {
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self { to, data: data.into() }
    }
}

/// Static description of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    pub name: String,
    pub description: String,
    /// The step's outputs depend on market conditions (swaps), so `min_balance` may be lower
    /// than `expected_balance` downstream.
    #[serde(default)]
    pub has_non_deterministic_output: bool,
    /// The step only re-labels balances and never contributes calls. Bracket steps set this;
    /// for any other step an empty call list is a modelling error.
    #[serde(default)]
    pub emits_no_transactions: bool,
}

impl StepConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            has_non_deterministic_output: false,
            emits_no_transactions: false,
        }
    }

    pub fn non_deterministic(mut self) -> Self {
        self.has_non_deterministic_output = true;
        self
    }

    pub fn without_transactions(mut self) -> Self {
        self.emits_no_transactions = true;
        self
    }
}

/// The ledger handed to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInput {
    pub network: Network,
    pub erc20_amounts: Vec<ERC20Balance>,
    pub nfts: Vec<NFTInfo>,
}

impl StepInput {
    pub fn new(network: Network, erc20_amounts: Vec<ERC20Balance>, nfts: Vec<NFTInfo>) -> Self {
        Self { network, erc20_amounts, nfts }
    }

    /// The input of the step that follows `output`.
    pub fn following(&self, output: &StepOutput) -> Self {
        Self {
            network: self.network,
            erc20_amounts: output.output_erc20_amounts.clone(),
            nfts: output.output_nfts.clone(),
        }
    }
}

/// What a step's protocol logic produces, before the engine normalises and validates it.
///
/// `None` list fields fall back to their defaults: empty for spent NFTs and fees, the
/// input's NFTs for `output_nfts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnvalidatedStepOutput {
    pub populated_transactions: Vec<PopulatedTransaction>,
    pub spent_erc20_amounts: Vec<ERC20AmountRecipient>,
    pub output_erc20_amounts: Vec<ERC20Balance>,
    pub spent_nfts: Option<Vec<NFTRecipient>>,
    pub output_nfts: Option<Vec<NFTInfo>>,
    pub fee_erc20_amount_recipients: Option<Vec<ERC20AmountRecipient>>,
}

/// A validated, fully populated step result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutput {
    pub name: String,
    pub description: String,
    pub spent_erc20_amounts: Vec<ERC20AmountRecipient>,
    pub output_erc20_amounts: Vec<ERC20Balance>,
    pub spent_nfts: Vec<NFTRecipient>,
    pub output_nfts: Vec<NFTInfo>,
    pub fee_erc20_amount_recipients: Vec<ERC20AmountRecipient>,
    pub populated_transactions: Vec<PopulatedTransaction>,
}
