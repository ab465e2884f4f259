//! Plasma token vault: wraps WETH into a share token earning flash lending fees.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use cookbook_common::models::step::PopulatedTransaction;

sol! {
    function deposit(uint256 _amount, uint256 _minShares) external;
    function withdraw(uint256 _shares, uint256 _minAssets) external;
}

/// Deposit `amount` of the underlying token, expecting at least `expected_shares` back.
pub fn create_deposit(plasma: Address, amount: U256, expected_shares: U256) -> PopulatedTransaction {
    let call = depositCall { _amount: amount, _minShares: expected_shares };
    PopulatedTransaction::new(plasma, call.abi_encode())
}

/// Burn `shares`, expecting at least `expected_assets` of the underlying token back.
pub fn create_withdraw(plasma: Address, shares: U256, expected_assets: U256) -> PopulatedTransaction {
    let call = withdrawCall { _shares: shares, _minAssets: expected_assets };
    PopulatedTransaction::new(plasma, call.abi_encode())
}
