//! Relay adapt contract: the multicall router that executes public calls on behalf of the
//! private pool.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use cookbook_common::models::step::PopulatedTransaction;

sol! {
    struct TokenData {
        uint8 tokenType;
        address tokenAddress;
        uint256 tokenSubID;
    }

    struct TokenTransfer {
        TokenData token;
        address to;
        uint256 value;
    }

    function transfer(TokenTransfer[] _transfers) external;
    function wrapBase(uint256 _amount) external;
    function unwrapBase(uint256 _amount) external;
}

const ERC20_TOKEN_TYPE: u8 = 0;

fn erc20_token_data(token_address: Address) -> TokenData {
    TokenData { tokenType: ERC20_TOKEN_TYPE, tokenAddress: token_address, tokenSubID: U256::ZERO }
}

/// One entry of a relay adapt transfer. A `None` amount transfers the full balance.
pub fn create_token_transfer(
    to: Address,
    token_address: Address,
    amount: Option<U256>,
) -> TokenTransfer {
    TokenTransfer { token: erc20_token_data(token_address), to, value: amount.unwrap_or_default() }
}

pub fn create_multi_token_transfer(
    relay_adapt: Address,
    transfers: Vec<TokenTransfer>,
) -> PopulatedTransaction {
    PopulatedTransaction::new(relay_adapt, transferCall { _transfers: transfers }.abi_encode())
}

pub fn create_base_token_wrap(relay_adapt: Address, amount: Option<U256>) -> PopulatedTransaction {
    let call = wrapBaseCall { _amount: amount.unwrap_or_default() };
    PopulatedTransaction::new(relay_adapt, call.abi_encode())
}

pub fn create_base_token_unwrap(relay_adapt: Address, amount: Option<U256>) -> PopulatedTransaction {
    let call = unwrapBaseCall { _amount: amount.unwrap_or_default() };
    PopulatedTransaction::new(relay_adapt, call.abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_balance_transfer_encodes_zero() {
        let relay_adapt = Address::with_last_byte(7);
        let transfer =
            create_token_transfer(Address::with_last_byte(1), Address::with_last_byte(2), None);

        let tx = create_multi_token_transfer(relay_adapt, vec![transfer]);
        let decoded = transferCall::abi_decode(&tx.data, true).unwrap();

        assert_eq!(tx.to, relay_adapt);
        assert_eq!(decoded._transfers.len(), 1);
        assert_eq!(decoded._transfers[0].value, U256::ZERO);
        assert_eq!(decoded._transfers[0].token.tokenAddress, Address::with_last_byte(2));
    }

    #[test]
    fn test_wrap_and_unwrap_use_distinct_selectors() {
        let wrap = create_base_token_wrap(Address::ZERO, Some(U256::from(5)));
        let unwrap = create_base_token_unwrap(Address::ZERO, Some(U256::from(5)));

        assert_eq!(wrap.data[..4], wrapBaseCall::SELECTOR);
        assert_eq!(unwrap.data[..4], unwrapBaseCall::SELECTOR);
        assert_ne!(wrap.data, unwrap.data);
    }
}
