//! Picking a step's input out of the ledger.

use alloy_primitives::{Address, U256};
use cookbook_common::{
    errors::CookbookError,
    models::token::{ERC20Balance, ERC20Info},
};

/// How much of a matched balance a step wants.
///
/// `Full` is the default across the engine: a step without an explicit amount consumes the entire
/// expected balance of its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestedAmount {
    #[default]
    Full,
    Exact(U256),
}

impl RequestedAmount {
    /// A zero amount is the full-balance sentinel.
    pub fn exact(amount: U256) -> Self {
        if amount.is_zero() {
            Self::Full
        } else {
            Self::Exact(amount)
        }
    }

    pub fn as_option(&self) -> Option<U256> {
        match self {
            Self::Full => None,
            Self::Exact(amount) => Some(*amount),
        }
    }
}

impl From<Option<U256>> for RequestedAmount {
    fn from(value: Option<U256>) -> Self {
        value.map_or(Self::Full, Self::exact)
    }
}

/// Predicate selecting a ledger entry: a token, optionally approved for a spender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ERC20Filter {
    token: ERC20Info,
    approved_spender: Option<Address>,
}

impl ERC20Filter {
    pub fn token(token: ERC20Info) -> Self {
        Self { token, approved_spender: None }
    }

    /// Additionally require the entry to be approved for `spender`. Used by steps that let a third
    /// party pull the funds.
    pub fn approved_for(mut self, spender: Address) -> Self {
        self.approved_spender = Some(spender);
        self
    }

    pub fn matches(&self, entry: &ERC20Balance) -> bool {
        if !self.token.matches(&entry.token) {
            return false;
        }
        match &self.approved_spender {
            Some(spender) => entry.is_approved_for(spender),
            None => true,
        }
    }

    fn no_match(&self, context: String) -> CookbookError {
        CookbookError::NoMatchingInput {
            context,
            token: self.token.token_address,
            spender: self.approved_spender,
        }
    }
}

/// The entry a step will consume plus everything it leaves untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedERC20 {
    pub erc20_amount_for_step: ERC20Balance,
    pub unused_erc20_amounts: Vec<ERC20Balance>,
}

/// Select the first entry of `ledger` matching `filter`.
///
/// With an exact amount the match is split: the step gets exactly that amount and the remainder is
/// appended to the unused entries, keeping the matched token and spender. Entries are never
/// aggregated; earlier steps are expected to have consolidated duplicates.
pub fn select_input(
    step_name: &str,
    ledger: &[ERC20Balance],
    filter: &ERC20Filter,
    amount: RequestedAmount,
) -> Result<MatchedERC20, CookbookError> {
    let position = ledger
        .iter()
        .position(|entry| filter.matches(entry))
        .ok_or_else(|| filter.no_match(format!("{step_name} step input")))?;

    let matched = &ledger[position];
    let mut unused_erc20_amounts: Vec<ERC20Balance> = ledger
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != position)
        .map(|(_, entry)| entry.clone())
        .collect();

    let erc20_amount_for_step = match amount {
        RequestedAmount::Full => matched.clone(),
        RequestedAmount::Exact(requested) => {
            if requested > matched.expected_balance {
                return Err(CookbookError::InsufficientBalance {
                    step: step_name.to_string(),
                    requested,
                    available: matched.expected_balance,
                });
            }
            if requested < matched.expected_balance {
                unused_erc20_amounts.push(matched.residual(requested));
            }
            ERC20Balance {
                token: matched.token.clone(),
                expected_balance: requested,
                min_balance: requested.min(matched.min_balance),
                approved_spender: matched.approved_spender,
            }
        }
    };

    Ok(MatchedERC20 { erc20_amount_for_step, unused_erc20_amounts })
}

/// Apply [`select_input`] once per request, each time on what the previous selection left over.
pub fn select_inputs(
    step_name: &str,
    ledger: &[ERC20Balance],
    requests: &[(ERC20Filter, RequestedAmount)],
) -> Result<(Vec<ERC20Balance>, Vec<ERC20Balance>), CookbookError> {
    let mut remaining = ledger.to_vec();
    let mut selected = Vec::with_capacity(requests.len());
    for (filter, amount) in requests {
        let matched = select_input(step_name, &remaining, filter, *amount)?;
        selected.push(matched.erc20_amount_for_step);
        remaining = matched.unused_erc20_amounts;
    }
    Ok((selected, remaining))
}

/// Locate the first entry for `token`, failing with a recipe-level message if it is missing.
pub fn find_first_input<'a>(
    ledger: &'a [ERC20Balance],
    token: &ERC20Info,
) -> Result<&'a ERC20Balance, CookbookError> {
    let filter = ERC20Filter::token(token.clone());
    ledger
        .iter()
        .find(|entry| filter.matches(entry))
        .ok_or_else(|| filter.no_match("First input for this recipe".to_string()))
}
