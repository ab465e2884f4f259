//! Beefy yield vaults.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use cookbook_common::models::step::PopulatedTransaction;

sol! {
    function depositAll() external;
}

/// Deposit the caller's full balance of the vault's deposit token.
pub fn create_deposit_all(vault: Address) -> PopulatedTransaction {
    PopulatedTransaction::new(vault, depositAllCall {}.abi_encode())
}
