use cookbook_common::{
    errors::CookbookError,
    models::step::{StepConfig, StepOutput},
};

/// Check the invariants every step output must hold before it becomes the next step's input.
pub fn validate_step_output(config: &StepConfig, output: &StepOutput) -> Result<(), CookbookError> {
    let invalid = |reason: String| CookbookError::step_validation(&config.name, reason);

    for entry in &output.output_erc20_amounts {
        if entry.min_balance > entry.expected_balance {
            return Err(invalid(format!(
                "Minimum balance {} exceeds expected balance {} for {}.",
                entry.min_balance, entry.expected_balance, entry.token
            )));
        }
    }

    for (index, entry) in output.output_erc20_amounts.iter().enumerate() {
        if output.output_erc20_amounts[..index]
            .iter()
            .any(|previous| previous.same_slot(entry))
        {
            return Err(invalid(format!("Duplicate output ERC20 entries for {}.", entry.token)));
        }
    }

    if output.populated_transactions.is_empty() && !config.emits_no_transactions {
        return Err(invalid("Step must produce at least one transaction.".to_string()));
    }

    Ok(())
}
