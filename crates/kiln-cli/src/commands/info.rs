//! `kiln info`: show what consumers of the package receive.

use kiln_core::domain::PackageInfo;

use crate::{
    cli::{Format, RecipeArgs},
    commands::load_recipe,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: RecipeArgs, output: OutputManager) -> CliResult<()> {
    let recipe = load_recipe(&args.recipe)?;

    let mut info = PackageInfo::default();
    recipe.package_info(&mut info);

    if args.format == Format::Json {
        output.json(&info)?;
        return Ok(());
    }

    output.header(&recipe.descriptor().reference())?;
    output.field("libs", info.libs.join(", "))?;
    output.field("include dirs", info.include_dirs.join(", "))?;
    output.field("lib dirs", info.lib_dirs.join(", "))?;
    output.field("bin dirs", info.bin_dirs.join(", "))?;
    for (key, value) in &info.properties {
        output.field(key, value)?;
    }
    Ok(())
}
