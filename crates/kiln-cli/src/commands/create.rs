//! Implementation of the `kiln create` command.
//!
//! Responsibility: resolve the recipe and build configuration, run the
//! package service, and display results. No business logic lives here.

use tracing::instrument;

use kiln_adapters::{CMakeTool, LocalFilesystem, MemoryFilesystem};
use kiln_core::application::{BuildOutcome, Lifecycle, MANIFEST_FILE, PackageService};

use crate::{
    cli::{CreateArgs, Format},
    commands::{build_configuration, load_recipe},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `kiln create` command.
///
/// A dry run drives the lifecycle against an in-memory filesystem and a
/// `cmake` that only records its command lines, so nothing on disk changes.
#[instrument(skip_all, fields(recipe = %args.recipe, dry_run = args.dry_run))]
pub fn execute(args: CreateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let recipe = load_recipe(&args.recipe)?;
    let (settings, roots) = build_configuration(&args.configuration, &config)?;

    let jobs = args.jobs.map(usize::from).or(config.build.jobs);
    if jobs == Some(0) {
        return Err(CliError::InvalidInput {
            message: "build.jobs must be at least 1".into(),
        });
    }
    let tool = CMakeTool::new()
        .program(&config.build.cmake)
        .jobs(jobs)
        .dry_run(args.dry_run);

    if args.format == Format::Table {
        output.header(&format!(
            "Creating {} ({settings})",
            recipe.descriptor().reference()
        ))?;
    }

    if args.dry_run {
        let fs = MemoryFilesystem::new();
        let outcome =
            Lifecycle::new(&tool, &fs).run(recipe, settings, &args.configuration.options, &roots)?;

        if args.format == Format::Json {
            output.json(&outcome)?;
            return Ok(());
        }
        output.info("Dry run: no commands were executed")?;
        for invocation in tool.history() {
            output.print(&format!("  [{}] {invocation}", invocation.step))?;
        }
        print_summary(&outcome, &output)?;
        return Ok(());
    }

    let service = PackageService::new(Box::new(tool), Box::new(LocalFilesystem::new()));
    let outcome = service.create(recipe, settings, &args.configuration.options, &roots)?;

    match args.format {
        Format::Json => output.json(&outcome)?,
        Format::Table => {
            print_summary(&outcome, &output)?;
            output.field(
                "manifest",
                outcome.layout.in_package(MANIFEST_FILE).display(),
            )?;
            output.success(&format!(
                "Package created at {}",
                outcome.layout.package_folder.display()
            ))?;
        }
    }
    Ok(())
}

fn print_summary(outcome: &BuildOutcome, output: &OutputManager) -> CliResult<()> {
    output.field("reference", &outcome.reference)?;
    output.field("package id", &outcome.package_id)?;
    output.field("options", &outcome.options)?;
    output.field("build folder", outcome.layout.build_folder.display())?;
    output.field("package folder", outcome.layout.package_folder.display())?;
    for file in &outcome.packaged_files {
        output.field("packaged", file.display())?;
    }
    Ok(())
}
