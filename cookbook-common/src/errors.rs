use std::time::Duration;

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::models::Network;

/// Every way evaluating a step or a recipe can fail.
///
/// None of these are retried. Errors cross the step -> chain -> recipe boundaries unchanged so the
/// originating message reaches the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CookbookError {
    #[error("Recipe {recipe} does not support network: {network}")]
    UnsupportedNetwork { recipe: String, network: Network },

    #[error("{context} must contain ERC20 Amount: {token:#x}{}", approval_suffix(.spender))]
    NoMatchingInput { context: String, token: Address, spender: Option<Address> },

    #[error("{step} step is invalid. Specified amount {requested} exceeds balance {available}.")]
    InsufficientBalance { step: String, requested: U256, available: U256 },

    #[error("{step} step is invalid. {reason}")]
    StepValidation { step: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Amount overflow: {0}")]
    Overflow(String),

    #[error("External lookup failed ({context}): {reason}")]
    ExternalLookup { context: String, reason: String },

    #[error("External lookup timed out after {}s: {context}", .timeout.as_secs())]
    Timeout { context: String, timeout: Duration },
}

fn approval_suffix(spender: &Option<Address>) -> String {
    match spender {
        Some(spender) => format!(" approved for spender {spender:#x}"),
        None => String::new(),
    }
}

impl CookbookError {
    pub fn step_validation(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StepValidation { step: step.into(), reason: reason.into() }
    }

    pub fn external(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::ExternalLookup { context: context.into(), reason: reason.to_string() }
    }
}
