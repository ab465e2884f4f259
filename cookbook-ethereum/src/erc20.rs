use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use cookbook_common::models::step::PopulatedTransaction;

// ERC20 interface definition
// Copied from EIP-20: https://eips.ethereum.org/EIPS/eip-20
sol! {
    function approve(address _spender, uint256 _value) public returns (bool success);
}

/// Encode approve(address,uint256) call
pub fn encode_approve(spender: Address, value: U256) -> Vec<u8> {
    approveCall { _spender: spender, _value: value }.abi_encode()
}

/// Allow `spender` to pull `amount` of `token` from the caller.
pub fn create_spender_approval(token: Address, spender: Address, amount: U256) -> PopulatedTransaction {
    PopulatedTransaction::new(token, encode_approve(spender, amount))
}
