//! Built-in recipes and recipe lookup.

mod dawg_logger;

use std::path::Path;

use kiln_core::{
    application::{ApplicationError, Recipe},
    error::KilnResult,
};

use crate::recipe_loader::DeclarativeRecipe;

pub use dawg_logger::DawgLoggerRecipe;

/// Names accepted by [`builtin`].
pub const BUILTIN_RECIPES: &[&str] = &[dawg_logger::NAME];

/// Instantiate a built-in recipe by name.
pub fn builtin(name: &str) -> Option<KilnResult<Box<dyn Recipe>>> {
    match name {
        dawg_logger::NAME => Some(
            DawgLoggerRecipe::new()
                .map(|r| Box::new(r) as Box<dyn Recipe>)
                .map_err(Into::into),
        ),
        _ => None,
    }
}

/// Resolve `spec` to a recipe: a built-in name first, then a path to a
/// `recipe.toml` or a directory holding one.
pub fn resolve(spec: &str) -> KilnResult<Box<dyn Recipe>> {
    if let Some(recipe) = builtin(spec) {
        return recipe;
    }

    let path = Path::new(spec);
    if !path.exists() {
        return Err(ApplicationError::RecipeNotFound { name: spec.into() }.into());
    }
    Ok(Box::new(DeclarativeRecipe::load(path)?))
}
