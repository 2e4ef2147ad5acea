//! Command handlers.
//!
//! Each handler translates parsed arguments into calls on `kiln-core`
//! services and renders the result. Helpers shared by several handlers live
//! here.

pub mod completions;
pub mod config;
pub mod create;
pub mod info;
pub mod init;
pub mod inspect;
pub mod layout;
pub mod requirements;

use kiln_core::{
    application::Recipe,
    domain::{LayoutRoots, Settings},
};
use tracing::debug;

use crate::{
    cli::ConfigurationArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

/// Resolve a built-in recipe name or a `recipe.toml` path.
pub(crate) fn load_recipe(spec: &str) -> CliResult<Box<dyn Recipe>> {
    let recipe = kiln_adapters::recipes::resolve(spec)?;
    debug!(recipe = %recipe.descriptor().reference(), "Recipe resolved");
    Ok(recipe)
}

/// Settings and folder roots for one build configuration.
pub(crate) fn build_configuration(
    args: &ConfigurationArgs,
    config: &AppConfig,
) -> CliResult<(Settings, LayoutRoots)> {
    let settings = config.settings(&args.settings)?;

    if !args.source.is_dir() {
        return Err(CliError::SourceNotFound {
            path: args.source.clone(),
        });
    }
    let source = args
        .source
        .canonicalize()
        .with_cli_context(|| format!("Failed to resolve '{}'", args.source.display()))?;

    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read current directory")?;
    let workspace = config.workspace(args.workspace.as_deref(), &cwd);

    debug!(
        settings = %settings,
        source = %source.display(),
        workspace = %workspace.display(),
        "Build configuration resolved"
    );
    Ok((settings, LayoutRoots::new(source, workspace)))
}
