use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::descriptor::RecipeDescriptor;
use crate::domain::options::Options;
use crate::domain::settings::Settings;

/// Identity of one binary configuration of a recipe.
///
/// SHA-256 over the recipe reference, the settings axes the recipe declares
/// and the resolved options. Settings the recipe does not declare, and the
/// generator list, never change the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn compute(descriptor: &RecipeDescriptor, settings: &Settings, options: &Options) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(descriptor.reference().as_bytes());
        hasher.update(b"\n[settings]\n");
        for (key, value) in settings.values_for(descriptor.settings()) {
            hasher.update(format!("{key}={value}\n").as_bytes());
        }
        hasher.update(b"[options]\n");
        for (key, value) in options.iter() {
            hasher.update(format!("{key}={value}\n").as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First twelve hex digits, for log lines and tables. A deserialized id
    /// shorter than that is returned whole.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
