use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Identity of a fungible token as it moves between steps.
///
/// `PartialEq` is structural. Use [`ERC20Info::matches`] when deciding whether a ledger entry is
/// the token a step is looking for: an unset `is_base_token` on either side matches anything.
/// Ledger bookkeeping uses the strict [`ERC20Info::same_token`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ERC20Info {
    pub token_address: Address,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_base_token: Option<bool>,
}

impl ERC20Info {
    pub fn new(token_address: Address, decimals: u8) -> Self {
        Self { token_address, decimals, is_base_token: None }
    }

    /// The native token of a network, represented by its wrapped contract address.
    pub fn base_token(wrapped_address: Address, decimals: u8) -> Self {
        Self { token_address: wrapped_address, decimals, is_base_token: Some(true) }
    }

    pub fn with_base_token(mut self, is_base_token: bool) -> Self {
        self.is_base_token = Some(is_base_token);
        self
    }

    pub fn matches(&self, other: &ERC20Info) -> bool {
        if self.token_address != other.token_address {
            return false;
        }
        match (self.is_base_token, other.is_base_token) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Ledger identity: same address and same base token flag, an unset flag counting as `false`.
    pub fn same_token(&self, other: &ERC20Info) -> bool {
        self.token_address == other.token_address &&
            self.is_base_token.unwrap_or(false) == other.is_base_token.unwrap_or(false)
    }
}

impl fmt::Display for ERC20Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.token_address)?;
        if self.is_base_token == Some(true) {
            write!(f, " (base token)")?;
        }
        Ok(())
    }
}

/// A ledger entry: a token balance available to the next step.
///
/// `expected_balance` is the best estimate used for downstream math, `min_balance` the amount that
/// is guaranteed even after slippage of non-deterministic upstream steps. A valid entry always has
/// `min_balance <= expected_balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ERC20Balance {
    #[serde(flatten)]
    pub token: ERC20Info,
    pub expected_balance: U256,
    pub min_balance: U256,
    #[serde(default)]
    pub approved_spender: Option<Address>,
}

impl ERC20Balance {
    /// A deterministic balance: expected and minimum are the same.
    pub fn new(token: ERC20Info, amount: U256) -> Self {
        Self { token, expected_balance: amount, min_balance: amount, approved_spender: None }
    }

    pub fn with_min_balance(mut self, min_balance: U256) -> Self {
        self.min_balance = min_balance;
        self
    }

    pub fn approved_for(mut self, spender: Address) -> Self {
        self.approved_spender = Some(spender);
        self
    }

    pub fn is_approved_for(&self, spender: &Address) -> bool {
        self.approved_spender.as_ref() == Some(spender)
    }

    /// What remains of this entry once `spent` has been taken out of it.
    pub fn residual(&self, spent: U256) -> Self {
        Self {
            token: self.token.clone(),
            expected_balance: self.expected_balance.saturating_sub(spent),
            min_balance: self.min_balance.saturating_sub(spent),
            approved_spender: self.approved_spender,
        }
    }

    /// Whether two entries can be merged into one without losing information.
    pub fn same_slot(&self, other: &ERC20Balance) -> bool {
        self.token.same_token(&other.token) && self.approved_spender == other.approved_spender
    }
}

/// A plain token amount, as supplied to and returned from a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ERC20Amount {
    #[serde(flatten)]
    pub token: ERC20Info,
    pub amount: U256,
}

impl ERC20Amount {
    pub fn new(token: ERC20Info, amount: U256) -> Self {
        Self { token, amount }
    }
}

impl From<&ERC20Balance> for ERC20Amount {
    fn from(value: &ERC20Balance) -> Self {
        Self { token: value.token.clone(), amount: value.expected_balance }
    }
}

impl From<ERC20Amount> for ERC20Balance {
    fn from(value: ERC20Amount) -> Self {
        ERC20Balance::new(value.token, value.amount)
    }
}

/// An amount that left the ledger, tagged with who received it.
///
/// `recipient` is either an address rendered as hex or a human readable label
/// such as "RAILGUN Shield Fee".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ERC20AmountRecipient {
    #[serde(flatten)]
    pub token: ERC20Info,
    pub amount: U256,
    pub recipient: String,
}

impl ERC20AmountRecipient {
    pub fn new(token: ERC20Info, amount: U256, recipient: impl Into<String>) -> Self {
        Self { token, amount, recipient: recipient.into() }
    }

    pub fn to_address(token: ERC20Info, amount: U256, recipient: &Address) -> Self {
        Self::new(token, amount, format!("{recipient:#x}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NFTTokenType {
    #[serde(rename = "erc721")]
    ERC721,
    #[serde(rename = "erc1155")]
    ERC1155,
}

/// Identity of a non-fungible token in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NFTInfo {
    pub nft_address: Address,
    pub token_sub_id: U256,
    pub nft_token_type: NFTTokenType,
}

impl NFTInfo {
    pub fn new(nft_address: Address, token_sub_id: U256, nft_token_type: NFTTokenType) -> Self {
        Self { nft_address, token_sub_id, nft_token_type }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NFTRecipient {
    #[serde(flatten)]
    pub nft: NFTInfo,
    pub recipient: String,
}
