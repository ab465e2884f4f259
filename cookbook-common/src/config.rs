//! Per-network contract addresses and fee schedules.
//!
//! A [`ChainConfig`] is built once and handed to recipes explicitly; there is no process wide
//! registry. It can be loaded from YAML:
//!
//! ```yaml
//! networks:
//!   ethereum:
//!     chain_id: 1
//!     relay_adapt_contract: "0x4025ee6512dbbda97049bcf5aa5d38c54af6be8a"
//!     base_token:
//!       symbol: WETH
//!       wrapped_address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
//!       decimals: 18
//!     shield_fee_basis_points: 25
//!     unshield_fee_basis_points: 25
//! ```

use std::{collections::HashMap, fs, path::Path};

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::CookbookError,
    models::{token::ERC20Info, Network},
};

/// Fees are expressed in basis points of this denominator.
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTokenConfig {
    pub symbol: String,
    pub wrapped_address: Address,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    #[serde(default)]
    pub relay_adapt_contract: Option<Address>,
    pub base_token: BaseTokenConfig,
    pub shield_fee_basis_points: u64,
    pub unshield_fee_basis_points: u64,
    #[serde(default)]
    pub plasma_token: Option<Address>,
}

impl NetworkConfig {
    pub fn relay_adapt(&self, network: Network) -> Result<Address, CookbookError> {
        self.relay_adapt_contract.ok_or_else(|| {
            CookbookError::Configuration(format!("Relay Adapt contract is not deployed on {network}"))
        })
    }

    pub fn plasma(&self, network: Network) -> Result<Address, CookbookError> {
        self.plasma_token.ok_or_else(|| {
            CookbookError::Configuration(format!("Plasma Token is not deployed on {network}"))
        })
    }

    /// The wrapped base token as an ERC20 (`is_base_token = false`).
    pub fn wrapped_base_token(&self) -> ERC20Info {
        ERC20Info::new(self.base_token.wrapped_address, self.base_token.decimals)
            .with_base_token(false)
    }

    /// The unwrapped base token (`is_base_token = true`).
    pub fn base_token(&self) -> ERC20Info {
        ERC20Info::base_token(self.base_token.wrapped_address, self.base_token.decimals)
    }
}

/// Lookup table of [`NetworkConfig`] by [`Network`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    networks: HashMap<Network, NetworkConfig>,
}

impl ChainConfig {
    pub fn new(networks: HashMap<Network, NetworkConfig>) -> Self {
        Self { networks }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, CookbookError> {
        serde_yaml::from_str(contents)
            .map_err(|e| CookbookError::Configuration(format!("Invalid chain config: {e}")))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CookbookError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading chain config");
        let contents = fs::read_to_string(path).map_err(|e| {
            CookbookError::Configuration(format!(
                "Failed to read chain config {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Deployed addresses and fees for the production networks plus a local hardhat fork.
    pub fn mainnet() -> Self {
        let ethereum = NetworkConfig {
            chain_id: Network::Ethereum.chain_id(),
            relay_adapt_contract: Some(address!("4025ee6512DBbda97049Bcf5AA5D38C54aF6bE8a")),
            base_token: BaseTokenConfig {
                symbol: "WETH".to_string(),
                wrapped_address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                decimals: 18,
            },
            shield_fee_basis_points: 25,
            unshield_fee_basis_points: 25,
            plasma_token: Some(address!("1dBDba33dfA381bCC89FCe74DFF69Aa96B53b503")),
        };
        let bnb = NetworkConfig {
            chain_id: Network::BnbChain.chain_id(),
            relay_adapt_contract: None,
            base_token: BaseTokenConfig {
                symbol: "WBNB".to_string(),
                wrapped_address: address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
                decimals: 18,
            },
            shield_fee_basis_points: 25,
            unshield_fee_basis_points: 25,
            plasma_token: None,
        };
        let polygon = NetworkConfig {
            chain_id: Network::Polygon.chain_id(),
            relay_adapt_contract: None,
            base_token: BaseTokenConfig {
                symbol: "WMATIC".to_string(),
                wrapped_address: address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
                decimals: 18,
            },
            shield_fee_basis_points: 25,
            unshield_fee_basis_points: 25,
            plasma_token: None,
        };
        let arbitrum = NetworkConfig {
            chain_id: Network::Arbitrum.chain_id(),
            relay_adapt_contract: None,
            base_token: BaseTokenConfig {
                symbol: "WETH".to_string(),
                wrapped_address: address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                decimals: 18,
            },
            shield_fee_basis_points: 25,
            unshield_fee_basis_points: 25,
            plasma_token: None,
        };
        let hardhat = NetworkConfig { chain_id: Network::Hardhat.chain_id(), ..ethereum.clone() };

        Self::new(HashMap::from([
            (Network::Ethereum, ethereum),
            (Network::BnbChain, bnb),
            (Network::Polygon, polygon),
            (Network::Arbitrum, arbitrum),
            (Network::Hardhat, hardhat),
        ]))
    }

    pub fn network(&self, network: Network) -> Result<&NetworkConfig, CookbookError> {
        self.networks
            .get(&network)
            .ok_or_else(|| CookbookError::Configuration(format!("Network not found: {network}")))
    }

    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.keys()
    }

    /// Replace the shield/unshield fees of a network, e.g. to pin them in tests.
    pub fn with_fees(
        mut self,
        network: Network,
        shield_fee_basis_points: u64,
        unshield_fee_basis_points: u64,
    ) -> Result<Self, CookbookError> {
        let config = self.networks.get_mut(&network).ok_or_else(|| {
            CookbookError::Configuration(format!("Network not found: {network}"))
        })?;
        config.shield_fee_basis_points = shield_fee_basis_points;
        config.unshield_fee_basis_points = unshield_fee_basis_points;
        Ok(self)
    }
}

/// `floor(amount * basis_points / 10000)`, exact for every `amount`.
///
/// Fails only when the fee itself does not fit, which needs more than 10000 basis points.
pub fn fee_for_basis_points(amount: U256, basis_points: u64) -> Result<U256, CookbookError> {
    let denominator = U256::from(BASIS_POINTS_DENOMINATOR);
    let basis_points_value = U256::from(basis_points);
    let remainder_share = (amount % denominator) * basis_points_value / denominator;
    (amount / denominator)
        .checked_mul(basis_points_value)
        .and_then(|whole| whole.checked_add(remainder_share))
        .ok_or_else(|| CookbookError::Overflow(format!("{basis_points} basis points of {amount}")))
}
