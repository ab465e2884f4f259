//! Uniswap V2 style routers.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use cookbook_common::{models::step::PopulatedTransaction, traits::AddLiquidityData};

sol! {
    function addLiquidity(
        address tokenA,
        address tokenB,
        uint256 amountADesired,
        uint256 amountBDesired,
        uint256 amountAMin,
        uint256 amountBMin,
        address to,
        uint256 deadline
    ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);
}

/// Deposit both tokens of `data` into their pair, minting LP tokens to `to`.
pub fn create_add_liquidity(data: &AddLiquidityData, to: Address) -> PopulatedTransaction {
    let call = addLiquidityCall {
        tokenA: data.erc20_amount_a.token.token_address,
        tokenB: data.erc20_amount_b.token.token_address,
        amountADesired: data.erc20_amount_a.amount,
        amountBDesired: data.erc20_amount_b.amount,
        amountAMin: data.min_amount_a,
        amountBMin: data.min_amount_b,
        to,
        deadline: data.deadline_timestamp,
    };
    PopulatedTransaction::new(data.router_contract, call.abi_encode())
}
