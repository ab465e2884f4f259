pub mod liquidity;
pub mod recipe;
pub mod step;
pub mod token;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Networks a recipe can be evaluated against.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Network {
    #[default]
    Ethereum,
    BnbChain,
    Polygon,
    Arbitrum,
    EthereumGoerli,
    PolygonMumbai,
    ArbitrumGoerli,
    Hardhat,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::BnbChain => 56,
            Network::Polygon => 137,
            Network::Arbitrum => 42161,
            Network::EthereumGoerli => 5,
            Network::PolygonMumbai => 80001,
            Network::ArbitrumGoerli => 421613,
            Network::Hardhat => 31337,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(
            self,
            Network::EthereumGoerli |
                Network::PolygonMumbai |
                Network::ArbitrumGoerli |
                Network::Hardhat
        )
    }
}
