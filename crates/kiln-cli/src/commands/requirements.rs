//! `kiln requirements`: list what a recipe declares it needs.

use serde::Serialize;

use kiln_core::domain::{RequirementKind, RequirementSet};

use crate::{
    cli::{Format, RecipeArgs},
    commands::load_recipe,
    error::CliResult,
    output::OutputManager,
};

#[derive(Serialize)]
struct RequirementsReport {
    tool_requires: Vec<String>,
    requires: Vec<String>,
}

pub fn execute(args: RecipeArgs, output: OutputManager) -> CliResult<()> {
    let recipe = load_recipe(&args.recipe)?;

    let mut tools = RequirementSet::new(RequirementKind::Build);
    let mut host = RequirementSet::new(RequirementKind::Host);
    recipe.build_requirements(&mut tools)?;
    recipe.requirements(&mut host)?;
    RequirementSet::ensure_disjoint(&tools, &host)?;

    let report = RequirementsReport {
        tool_requires: tools.iter().map(ToString::to_string).collect(),
        requires: host.iter().map(ToString::to_string).collect(),
    };

    if args.format == Format::Json {
        output.json(&report)?;
        return Ok(());
    }

    output.header(&recipe.descriptor().reference())?;
    print_section(&output, "tool requires", &report.tool_requires)?;
    print_section(&output, "requires", &report.requires)?;
    Ok(())
}

fn print_section(output: &OutputManager, label: &str, items: &[String]) -> CliResult<()> {
    if items.is_empty() {
        output.field(label, "(none)")?;
    }
    for item in items {
        output.field(label, item)?;
    }
    Ok(())
}
