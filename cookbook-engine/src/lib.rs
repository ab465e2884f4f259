//! Step pipeline engine.
//!
//! A [`Recipe`](recipe::Recipe) is a template for one business intent ("wrap WETH into plasma",
//! "swap on 0x"). Evaluating it runs an ordered list of [`Step`](step::Step)s:
//!
//! ```text
//! RecipeInput -> [Unshield] -> internal steps -> [Shield] -> RecipeOutput
//! ```
//!
//! Every step receives the ledger produced by its predecessor, picks the balance it needs out of
//! it, builds its contract calls and hands a new ledger to the next step. The engine validates
//! each step's output before moving on and aggregates fees, calls and final balances once the
//! last step has run. Nothing is ever submitted on-chain; the output is a list of populated
//! transactions for the caller to execute.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod chain;
pub mod lookup;
pub mod recipe;
pub mod recipes;
pub mod step;
pub mod steps;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::StepChain;
pub use recipe::Recipe;
pub use step::{
    matching::{ERC20Filter, MatchedERC20, RequestedAmount},
    Step,
};
