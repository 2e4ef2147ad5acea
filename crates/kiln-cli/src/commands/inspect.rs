//! `kiln inspect`: show a recipe's descriptor.

use crate::{
    cli::{Format, RecipeArgs},
    commands::load_recipe,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: RecipeArgs, output: OutputManager) -> CliResult<()> {
    let recipe = load_recipe(&args.recipe)?;
    let descriptor = recipe.descriptor();

    if args.format == Format::Json {
        output.json(descriptor)?;
        return Ok(());
    }

    output.header(&descriptor.reference())?;
    if let Some(description) = descriptor.description() {
        output.field("description", description)?;
    }
    if let Some(author) = descriptor.author() {
        output.field("author", author)?;
    }
    if let Some(url) = descriptor.url() {
        output.field("url", url)?;
    }
    if let Some(license) = descriptor.license() {
        output.field("license", license)?;
    }
    output.field("topics", join(descriptor.topics()))?;
    output.field("settings", join(descriptor.settings()))?;
    output.field("generators", join(descriptor.generators()))?;
    output.field("exports sources", join(descriptor.exports_sources()))?;
    for option in descriptor.options() {
        output.field(
            &format!("option {}", option.name()),
            format!(
                "{} (default {})",
                option.allowed().join("|"),
                option.default_value()
            ),
        )?;
    }
    Ok(())
}

fn join<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
