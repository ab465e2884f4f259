//! Call-data construction for every contract the cookbook steps interact with.
//!
//! Each module wraps one contract interface declared with `sol!` and exposes small builders that
//! return a [`PopulatedTransaction`](cookbook_common::models::step::PopulatedTransaction). Amount
//! arguments follow the contracts' own convention that zero means "the caller's full balance".

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod beefy;
pub mod erc20;
pub mod plasma;
pub mod relay_adapt;
pub mod uni_v2;
