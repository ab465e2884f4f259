//! Interfaces to the external collaborators steps and recipes depend on.
//!
//! The engine never talks to a node or an HTTP API itself. Implementations of these traits do, and
//! the engine only awaits their already-resolved answers.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    errors::CookbookError,
    models::{
        liquidity::UniswapV2Fork,
        step::PopulatedTransaction,
        token::{ERC20Amount, ERC20Info},
        Network,
    },
};

/// Share conversion of the plasma token vault.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait PlasmaVault: Send + Sync {
    /// Plasma tokens minted for depositing `assets` of the underlying token.
    async fn calculate_shares(&self, network: Network, assets: U256)
        -> Result<U256, CookbookError>;

    /// Underlying tokens returned for burning `shares` plasma tokens.
    async fn calculate_assets(&self, network: Network, shares: U256)
        -> Result<U256, CookbookError>;
}

/// Parameters for a DEX aggregator quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuoteParams {
    pub sell_token: ERC20Info,
    pub buy_token: ERC20Info,
    pub sell_amount: U256,
    pub slippage_basis_points: u64,
}

/// A resolved DEX aggregator quote, including the call that executes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub sell_token_value: U256,
    pub buy_erc20_amount: ERC20Amount,
    pub minimum_buy_amount: U256,
    /// Contract that pulls the sell token; it must be approved beforehand.
    pub spender: Address,
    pub populated_transaction: PopulatedTransaction,
}

#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait SwapQuoter: Send + Sync {
    async fn quote(
        &self,
        network: Network,
        params: &SwapQuoteParams,
    ) -> Result<SwapQuote, CookbookError>;
}

/// Desired deposit into a Uniswap V2 style pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityParams {
    pub fork: UniswapV2Fork,
    pub erc20_amount_a: ERC20Amount,
    pub erc20_amount_b: ERC20Amount,
    pub slippage_basis_points: u64,
}

/// Router call parameters and expected LP output for an add liquidity, resolved against the pool
/// reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityData {
    /// Router that pulls both tokens; it must be approved for each beforehand.
    pub router_contract: Address,
    pub erc20_amount_a: ERC20Amount,
    pub erc20_amount_b: ERC20Amount,
    pub min_amount_a: U256,
    pub min_amount_b: U256,
    pub expected_lp_amount: ERC20Amount,
    pub min_lp_amount: U256,
    pub deadline_timestamp: U256,
}

#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait LiquidityQuoter: Send + Sync {
    async fn add_liquidity_data(
        &self,
        network: Network,
        params: &AddLiquidityParams,
    ) -> Result<AddLiquidityData, CookbookError>;
}

/// On-chain token metadata lookups.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait TokenMetadataProvider: Send + Sync {
    async fn decimals(&self, network: Network, token: Address) -> Result<u8, CookbookError>;
}
