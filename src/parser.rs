//! Parses and validates the completion service's free-text replies.
//!
//! The model is untrusted: it may wrap structured output in code fences, drift
//! from the requested shape, or invent categories. Replies are parsed
//! defensively and failures classified into the error taxonomy; raw parser
//! diagnostics stay in the logs.
//!
//! Recovery granularity differs per task: extraction recovers row by row,
//! recommendation rejects the whole reply.

use crate::error::{PipelineError, PipelineResult};
use crate::model::{Category, ExtractedItem, Recipe};
use crate::prompt::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use log::debug;
use serde_json::Value;

/// Removes a surrounding code-fence block the model may have added despite
/// instructions, with or without a language tag on the opening fence.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };

    match rest.split_once('\n') {
        Some((first_line, body)) if first_line.chars().all(|c| c.is_ascii_alphanumeric()) => {
            body.trim()
        }
        _ => rest.trim(),
    }
}

/// Parses an extraction reply into validated inventory items.
///
/// The reply must be a top-level array of `[name, quantity, category,
/// timestamp]` rows. A malformed top level is fatal; a malformed row is
/// dropped, mirroring the prompt's own instruction to omit unclear items. An
/// array that yields zero surviving rows is a successful empty result.
pub fn parse_extraction(raw: &str) -> PipelineResult<Vec<ExtractedItem>> {
    let stripped = strip_fences(raw);

    let rows = match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            return Err(PipelineError::response_format(
                "extraction reply was not a top-level array",
            ))
        }
        Err(err) => {
            return Err(PipelineError::response_format(format!(
                "extraction reply was not a well-formed list: {err}"
            )))
        }
    };

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        match validate_row(row) {
            Some(item) => items.push(item),
            None => debug!("dropping malformed extraction row: {row}"),
        }
    }

    Ok(items)
}

/// Row-level validation. `None` drops the row without failing the response.
fn validate_row(row: &Value) -> Option<ExtractedItem> {
    let fields = row.as_array()?;
    // Exact arity required; 3-tuples and 5-tuples are row failures.
    if fields.len() != 4 {
        return None;
    }

    let name = fields[0].as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let quantity = coerce_quantity(&fields[1])?;
    let category = Category::from_label(fields[2].as_str()?)?;

    let observed_at = fields[3].as_str()?;
    NaiveDateTime::parse_from_str(observed_at, TIMESTAMP_FORMAT).ok()?;

    Some(ExtractedItem {
        name: name.to_string(),
        quantity,
        category,
        observed_at: observed_at.to_string(),
    })
}

/// Quantity coercion per the prompt contract: an absent or non-numeric
/// quantity means 1, a numeric string parses, and anything structurally off
/// drops the row rather than becoming a silent zero.
fn coerce_quantity(value: &Value) -> Option<u32> {
    match value {
        Value::Null => Some(1),
        Value::Number(n) => {
            let n = n.as_i64()?;
            u32::try_from(n).ok().filter(|q| *q >= 1)
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(1);
            }
            match s.parse::<i64>() {
                Ok(n) => u32::try_from(n).ok().filter(|q| *q >= 1),
                Err(_) => Some(1),
            }
        }
        _ => None,
    }
}

/// Parses a recommendation reply into validated recipes.
///
/// The reply must be a JSON array of objects carrying `name`, `ingredients`,
/// and `instructions`. Any missing field, empty required value, or empty array
/// rejects the whole reply.
pub fn parse_recommendation(raw: &str) -> PipelineResult<Vec<Recipe>> {
    let stripped = strip_fences(raw);

    let recipes: Vec<Recipe> = serde_json::from_str(stripped).map_err(|err| {
        PipelineError::response_format(format!(
            "recommendation reply did not match the recipe schema: {err}"
        ))
    })?;

    if recipes.is_empty() {
        return Err(PipelineError::response_format(
            "recommendation reply contained no recipes",
        ));
    }

    for recipe in &recipes {
        validate_recipe(recipe)?;
    }

    Ok(recipes)
}

fn validate_recipe(recipe: &Recipe) -> PipelineResult<()> {
    if recipe.name.trim().is_empty() {
        return Err(PipelineError::response_format("recipe with an empty name"));
    }
    if recipe.ingredients.is_empty() {
        return Err(PipelineError::response_format(format!(
            "recipe '{}' has no ingredients",
            recipe.name
        )));
    }
    if recipe.ingredients.iter().any(|i| i.trim().is_empty()) {
        return Err(PipelineError::response_format(format!(
            "recipe '{}' has an empty ingredient entry",
            recipe.name
        )));
    }
    if recipe.instructions.trim().is_empty() {
        return Err(PipelineError::response_format(format!(
            "recipe '{}' has empty instructions",
            recipe.name
        )));
    }
    Ok(())
}
