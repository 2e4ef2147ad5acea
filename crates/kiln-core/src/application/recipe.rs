//! The recipe hook contract.
//!
//! A recipe is a descriptor plus six hooks. `Lifecycle` calls the hooks in
//! a fixed order, once each:
//!
//! 1. `layout` - resolve folders from settings and options
//! 2. `build_requirements` - declare tool requirements
//! 3. `requirements` - declare host requirements
//! 4. `build` - drive the build tool through `BuildExecutor`
//! 5. `package` - copy extra files into the package folder
//! 6. `package_info` - publish consumer metadata
//!
//! Every hook except `descriptor` has a default, so a recipe only overrides
//! what it needs.

use crate::application::services::{BuildExecutor, Packager};
use crate::domain::{
    Layout, LayoutRoots, LayoutStyle, Options, PackageInfo, RecipeDescriptor, RequirementSet,
    Settings,
};
use crate::error::KilnResult;

pub trait Recipe {
    /// Static metadata: name, version, settings axes, generators, options.
    fn descriptor(&self) -> &RecipeDescriptor;

    /// Resolve folder roles. Defaults to the basic layout.
    fn layout(
        &self,
        settings: &Settings,
        options: &Options,
        roots: &LayoutRoots,
    ) -> KilnResult<Layout> {
        Ok(Layout::resolve(
            LayoutStyle::Basic,
            self.descriptor(),
            settings,
            options,
            roots,
        )?)
    }

    /// Declare build-time tool requirements. Defaults to none.
    fn build_requirements(&self, _requirements: &mut RequirementSet) -> KilnResult<()> {
        Ok(())
    }

    /// Declare host requirements. Defaults to none.
    fn requirements(&self, _requirements: &mut RequirementSet) -> KilnResult<()> {
        Ok(())
    }

    /// Configure, build and install. Defaults to doing nothing.
    fn build(&self, _build: &mut BuildExecutor<'_>) -> KilnResult<()> {
        Ok(())
    }

    /// Copy auxiliary files into the package folder. Defaults to nothing.
    fn package(&self, _packager: &mut Packager<'_>) -> KilnResult<()> {
        Ok(())
    }

    /// Publish what consumers link against. Defaults to the empty info.
    fn package_info(&self, _info: &mut PackageInfo) {}
}

impl<R: Recipe + ?Sized> Recipe for Box<R> {
    fn descriptor(&self) -> &RecipeDescriptor {
        (**self).descriptor()
    }

    fn layout(
        &self,
        settings: &Settings,
        options: &Options,
        roots: &LayoutRoots,
    ) -> KilnResult<Layout> {
        (**self).layout(settings, options, roots)
    }

    fn build_requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
        (**self).build_requirements(requirements)
    }

    fn requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
        (**self).requirements(requirements)
    }

    fn build(&self, build: &mut BuildExecutor<'_>) -> KilnResult<()> {
        (**self).build(build)
    }

    fn package(&self, packager: &mut Packager<'_>) -> KilnResult<()> {
        (**self).package(packager)
    }

    fn package_info(&self, info: &mut PackageInfo) {
        (**self).package_info(info)
    }
}
