//! Recipes: an unshield bracket, recipe specific steps, and a shield bracket.

pub mod output;

use std::sync::Arc;

use async_trait::async_trait;
use cookbook_common::{
    config::ChainConfig,
    errors::CookbookError,
    models::{
        recipe::{RecipeConfig, RecipeInput, RecipeOutput},
        step::StepInput,
        Network,
    },
};
use tracing::{info, instrument};

use crate::{
    chain::StepChain,
    recipe::output::assemble_recipe_output,
    step::Step,
    steps::railgun::{ShieldDefaultStep, UnshieldDefaultStep},
};

#[async_trait]
pub trait Recipe: Send + Sync {
    fn config(&self) -> &RecipeConfig;

    fn chain_config(&self) -> &Arc<ChainConfig>;

    fn supports_network(&self, network: Network) -> bool;

    /// The steps between the brackets, built from the ledger as it looks right after unshielding.
    async fn get_internal_steps(
        &self,
        first_internal_step_input: &StepInput,
    ) -> Result<Vec<Box<dyn Step>>, CookbookError>;

    /// Evaluate the recipe end to end.
    async fn get_recipe_output(&self, input: RecipeInput) -> Result<RecipeOutput, CookbookError> {
        evaluate_recipe(self, input).await
    }
}

#[instrument(skip_all, fields(recipe = %recipe.config().name, network = %input.network))]
async fn evaluate_recipe<R: Recipe + ?Sized>(
    recipe: &R,
    input: RecipeInput,
) -> Result<RecipeOutput, CookbookError> {
    let config = recipe.config();
    if !recipe.supports_network(input.network) {
        return Err(CookbookError::UnsupportedNetwork {
            recipe: config.name.clone(),
            network: input.network,
        });
    }

    let chain_config = recipe.chain_config();
    let input = StepInput::from(input);
    let unshield_output = UnshieldDefaultStep::new(chain_config.clone())
        .run(&input)
        .await?;
    let first_internal_step_input = input.following(&unshield_output);

    let mut steps = recipe
        .get_internal_steps(&first_internal_step_input)
        .await?;
    steps.push(Box::new(ShieldDefaultStep::new(chain_config.clone())));

    let mut step_outputs = vec![unshield_output];
    step_outputs.extend(
        StepChain::new(steps)
            .execute(first_internal_step_input)
            .await?,
    );

    let output = assemble_recipe_output(config, step_outputs);
    info!(
        steps = output.step_outputs.len(),
        transactions = output.populated_transactions.len(),
        "Evaluated recipe"
    );
    Ok(output)
}
