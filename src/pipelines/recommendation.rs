use crate::completion::CompletionClient;
use crate::error::{PipelineError, PipelineResult};
use crate::model::{IngredientRef, Recipe};
use crate::parser;
use crate::prompt;
use log::info;

/// Ingredient list → prompt → completion → validated recipes.
///
/// No external resource to release; the only upstream call is the completion
/// service.
pub struct RecommendationPipeline {
    completion: CompletionClient,
    recipe_count: u32,
}

impl RecommendationPipeline {
    pub fn new(completion: CompletionClient, recipe_count: u32) -> Self {
        RecommendationPipeline {
            completion,
            recipe_count,
        }
    }

    pub async fn run(&self, ingredients: &[IngredientRef]) -> PipelineResult<Vec<Recipe>> {
        if ingredients.is_empty() {
            return Err(PipelineError::InputMissing("No ingredients provided"));
        }

        let prompt = prompt::recommendation_prompt(ingredients, self.recipe_count);
        let reply = self.completion.complete(&prompt).await?;
        let recipes = parser::parse_recommendation(&reply)?;

        info!("recommended {} recipe(s)", recipes.len());
        Ok(recipes)
    }
}
