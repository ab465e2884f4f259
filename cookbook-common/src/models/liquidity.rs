use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::Network;

/// Uniswap V2 style AMMs sharing the same router interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum UniswapV2Fork {
    #[strum(to_string = "Uniswap V2")]
    Uniswap,
    #[strum(to_string = "SushiSwap V2")]
    SushiSwap,
    #[strum(to_string = "QuickSwap")]
    QuickSwap,
    #[strum(to_string = "PancakeSwap")]
    PancakeSwap,
}

impl UniswapV2Fork {
    pub fn supports_network(&self, network: Network) -> bool {
        match self {
            UniswapV2Fork::Uniswap => matches!(network, Network::Ethereum | Network::EthereumGoerli),
            UniswapV2Fork::SushiSwap => matches!(
                network,
                Network::Ethereum | Network::Polygon | Network::Arbitrum | Network::BnbChain
            ),
            UniswapV2Fork::QuickSwap => network == Network::Polygon,
            UniswapV2Fork::PancakeSwap => network == Network::BnbChain,
        }
    }
}
