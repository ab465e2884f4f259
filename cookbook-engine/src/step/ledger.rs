//! Ledger housekeeping shared by steps that add or relabel entries.

use cookbook_common::models::token::ERC20Balance;

/// Merge entries occupying the same slot (same token, same spender), keeping the position of
/// the first occurrence.
pub fn consolidate(entries: impl IntoIterator<Item = ERC20Balance>) -> Vec<ERC20Balance> {
    let mut merged: Vec<ERC20Balance> = Vec::new();
    for entry in entries {
        match merged
            .iter_mut()
            .find(|existing| existing.same_slot(&entry))
        {
            Some(existing) => {
                existing.expected_balance = existing
                    .expected_balance
                    .saturating_add(entry.expected_balance);
                existing.min_balance = existing
                    .min_balance
                    .saturating_add(entry.min_balance);
            }
            None => merged.push(entry),
        }
    }
    merged
}

/// Drop every approval. Approvals only mean something to public contracts.
pub fn strip_approvals(entries: impl IntoIterator<Item = ERC20Balance>) -> Vec<ERC20Balance> {
    entries
        .into_iter()
        .map(|mut entry| {
            entry.approved_spender = None;
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use cookbook_common::models::token::ERC20Info;

    use super::*;
    use crate::testing::{plasma_address, weth};

    #[test]
    fn test_consolidate_keeps_first_position() {
        let other = ERC20Info::new(Address::with_last_byte(0x12), 6);
        let entries = vec![
            ERC20Balance::new(weth(), U256::from(10)),
            ERC20Balance::new(other.clone(), U256::from(3)),
            ERC20Balance::new(weth(), U256::from(5)).with_min_balance(U256::from(4)),
        ];

        let merged = consolidate(entries);

        assert_eq!(
            merged,
            vec![
                ERC20Balance::new(weth(), U256::from(15)).with_min_balance(U256::from(14)),
                ERC20Balance::new(other, U256::from(3)),
            ]
        );
    }

    #[test]
    fn test_consolidate_respects_spender() {
        let entries = vec![
            ERC20Balance::new(weth(), U256::from(10)).approved_for(plasma_address()),
            ERC20Balance::new(weth(), U256::from(5)),
        ];

        assert_eq!(consolidate(entries.clone()), entries);
    }

    #[test]
    fn test_strip_then_consolidate() {
        let entries = vec![
            ERC20Balance::new(weth(), U256::from(10)).approved_for(plasma_address()),
            ERC20Balance::new(weth(), U256::from(5)),
        ];

        let merged = consolidate(strip_approvals(entries));

        assert_eq!(merged, vec![ERC20Balance::new(weth(), U256::from(15))]);
    }
}
