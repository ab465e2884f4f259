//! Shared models, configuration, errors and collaborator traits for the recipe cookbook.
//!
//! Everything in this crate is plain data or an interface. The step pipeline itself lives in
//! `cookbook-engine`, call-data construction in `cookbook-ethereum`.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use alloy_primitives::{Address, Bytes, U256};
