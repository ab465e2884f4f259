//! Sequential step execution.

use cookbook_common::{
    errors::CookbookError,
    models::step::{StepInput, StepOutput},
};
use tracing::{debug, instrument};

use crate::step::Step;

/// An ordered list of steps, each fed the ledger the previous one produced.
pub struct StepChain {
    steps: Vec<Box<dyn Step>>,
}

impl StepChain {
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self { steps }
    }

    /// Get the number of steps in the chain.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order and return their outputs.
    ///
    /// Stops at the first failing step and returns its error unchanged; no partial output is
    /// produced.
    #[instrument(skip_all, fields(steps = self.steps.len(), network = %input.network))]
    pub async fn execute(&self, input: StepInput) -> Result<Vec<StepOutput>, CookbookError> {
        if self.steps.is_empty() {
            return Err(CookbookError::Configuration(
                "Cannot execute empty step chain".to_string(),
            ));
        }

        let mut current_input = input;
        let mut outputs = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let output = step.run(&current_input).await?;
            debug!(
                step = %output.name,
                ledger_size = output.output_erc20_amounts.len(),
                "Executed step"
            );
            current_input = current_input.following(&output);
            outputs.push(output);
        }

        Ok(outputs)
    }
}
