//! `kiln layout`: resolve folders, requirements and the package id without
//! building anything.

use serde::Serialize;

use kiln_core::{
    application::Lifecycle,
    domain::{Layout, PackageId},
};

use crate::{
    cli::{Format, LayoutArgs},
    commands::{build_configuration, load_recipe},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Serialize)]
struct LayoutReport<'a> {
    reference: &'a str,
    package_id: &'a PackageId,
    settings: String,
    layout: &'a Layout,
}

pub fn execute(args: LayoutArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let recipe = load_recipe(&args.recipe)?;
    let (settings, roots) = build_configuration(&args.configuration, &config)?;
    let plan = Lifecycle::plan(&recipe, settings, &args.configuration.options, &roots)?;

    if args.format == Format::Json {
        output.json(&LayoutReport {
            reference: &plan.reference,
            package_id: &plan.package_id,
            settings: plan.settings.to_string(),
            layout: &plan.layout,
        })?;
        return Ok(());
    }

    output.header(&format!("{} ({})", plan.reference, plan.settings))?;
    output.field("package id", &plan.package_id)?;
    output.field("source", plan.layout.source_folder.display())?;
    output.field("build", plan.layout.build_folder.display())?;
    output.field("generators", plan.layout.generators_folder.display())?;
    output.field("package", plan.layout.package_folder.display())?;
    Ok(())
}
