//! The `RecipeDescriptor`: identity and metadata of a recipe.
//!
//! A descriptor is built once through [`RecipeDescriptorBuilder`] and is
//! immutable afterwards. Every fresh recipe instance for a build reads from
//! the same descriptor.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::options::{OptionDecl, Options};
use crate::domain::settings::SettingsAxis;
use crate::domain::validation::DomainValidator;

/// Identity and metadata of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDescriptor {
    name: String,
    version: String,
    author: Option<String>,
    url: Option<String>,
    description: Option<String>,
    license: Option<String>,
    topics: BTreeSet<String>,
    settings: Vec<SettingsAxis>,
    exports_sources: Vec<String>,
    generators: Vec<String>,
    options: Vec<OptionDecl>,
}

impl RecipeDescriptor {
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> RecipeDescriptorBuilder {
        RecipeDescriptorBuilder::new(name, version)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version(&self) -> &str {
        &self.version
    }
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }
    pub fn topics(&self) -> &BTreeSet<String> {
        &self.topics
    }
    pub fn settings(&self) -> &[SettingsAxis] {
        &self.settings
    }
    pub fn exports_sources(&self) -> &[String] {
        &self.exports_sources
    }
    pub fn generators(&self) -> &[String] {
        &self.generators
    }
    pub fn options(&self) -> &[OptionDecl] {
        &self.options
    }

    /// `name/version`.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// Resolve user option assignments against this recipe's declarations.
    pub fn resolve_options<I, S>(&self, assignments: I) -> DomainResult<Options>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Options::resolve(&self.options, assignments)
    }

    /// Re-check every descriptor invariant.
    pub fn validate(&self) -> DomainResult<()> {
        DomainValidator::descriptor_name(&self.name)?;
        DomainValidator::descriptor_version(&self.version)?;

        let mut seen_axes = HashSet::new();
        for axis in &self.settings {
            if !seen_axes.insert(axis) {
                return Err(DomainError::InvalidDescriptor(format!(
                    "settings axis '{axis}' declared twice"
                )));
            }
        }

        for pattern in &self.exports_sources {
            glob::Pattern::new(pattern).map_err(|e| {
                DomainError::InvalidDescriptor(format!("invalid export pattern '{pattern}': {e}"))
            })?;
        }

        if let Some(empty) = self.generators.iter().find(|g| g.trim().is_empty()) {
            return Err(DomainError::InvalidDescriptor(format!(
                "generator name '{empty}' is blank"
            )));
        }

        let mut seen_options = HashSet::new();
        for option in &self.options {
            if !seen_options.insert(option.name()) {
                return Err(DomainError::InvalidDescriptor(format!(
                    "option '{}' declared twice",
                    option.name()
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for RecipeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

/// Builder for [`RecipeDescriptor`]; `build()` validates.
#[derive(Debug, Clone)]
pub struct RecipeDescriptorBuilder {
    inner: RecipeDescriptor,
}

impl RecipeDescriptorBuilder {
    fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            inner: RecipeDescriptor {
                name: name.into(),
                version: version.into(),
                author: None,
                url: None,
                description: None,
                license: None,
                topics: BTreeSet::new(),
                settings: Vec::new(),
                exports_sources: Vec::new(),
                generators: Vec::new(),
                options: Vec::new(),
            },
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.inner.author = Some(author.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.inner.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = Some(description.into());
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.inner.license = Some(license.into());
        self
    }

    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.topics.extend(topics.into_iter().map(Into::into));
        self
    }

    pub fn settings(mut self, axes: impl IntoIterator<Item = SettingsAxis>) -> Self {
        self.inner.settings.extend(axes);
        self
    }

    pub fn exports_sources<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .exports_sources
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn generators<I, S>(mut self, generators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .generators
            .extend(generators.into_iter().map(Into::into));
        self
    }

    pub fn option(mut self, decl: OptionDecl) -> Self {
        self.inner.options.push(decl);
        self
    }

    pub fn build(self) -> DomainResult<RecipeDescriptor> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
