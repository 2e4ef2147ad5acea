//! Recipe options: declared knobs beyond the settings tuple.
//!
//! A recipe declares each option with its allowed values and a default. The
//! values a user passes in are checked against those declarations and merged
//! over the defaults, so a resolved [`Options`] always carries every declared
//! option and nothing else.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::settings::split_assignment;

/// Declaration of a single option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    name: String,
    allowed: Vec<String>,
    default: String,
}

impl OptionDecl {
    /// Declare an option. The default must be one of `allowed`.
    pub fn new<I, S>(name: impl Into<String>, allowed: I, default: impl Into<String>) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        let default = default.into();

        if name.is_empty() {
            return Err(DomainError::InvalidDescriptor("option name is empty".into()));
        }
        if allowed.is_empty() {
            return Err(DomainError::InvalidDescriptor(format!(
                "option '{name}' declares no allowed values"
            )));
        }
        if !allowed.contains(&default) {
            return Err(DomainError::InvalidDescriptor(format!(
                "default '{default}' of option '{name}' is not an allowed value"
            )));
        }

        Ok(Self {
            name,
            allowed,
            default,
        })
    }

    /// Boolean option with values `True` / `False`.
    pub fn boolean(name: impl Into<String>, default: bool) -> DomainResult<Self> {
        Self::new(name, ["True", "False"], bool_text(default))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    fn check(&self, value: &str) -> DomainResult<String> {
        // Boolean spellings are normalised so `-o shared=true` works.
        let candidate = match value.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" if self.is_boolean() => "True".to_string(),
            "false" | "off" | "no" | "0" if self.is_boolean() => "False".to_string(),
            _ => value.to_string(),
        };

        if self.allowed.contains(&candidate) {
            Ok(candidate)
        } else {
            Err(DomainError::InvalidOptionValue {
                name: self.name.clone(),
                value: value.into(),
                allowed: self.allowed.join(", "),
            })
        }
    }

    fn is_boolean(&self) -> bool {
        self.allowed.len() == 2
            && self.allowed.iter().any(|v| v == "True")
            && self.allowed.iter().any(|v| v == "False")
    }
}

fn bool_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Resolved option values, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Options(BTreeMap<String, String>);

impl Options {
    /// Resolve user `key=value` assignments against `decls`.
    ///
    /// Unknown names and disallowed values are rejected; missing names take
    /// their declared default.
    pub fn resolve<I, S>(decls: &[OptionDecl], assignments: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values: BTreeMap<String, String> = decls
            .iter()
            .map(|d| (d.name.clone(), d.default.clone()))
            .collect();

        for raw in assignments {
            let (name, value) = split_assignment(raw.as_ref())?;
            let decl = decls
                .iter()
                .find(|d| d.name == name)
                .ok_or_else(|| DomainError::UnknownOption { name: name.into() })?;
            values.insert(decl.name.clone(), decl.check(value)?);
        }

        Ok(Self(values))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Interpret a boolean option; `None` if undeclared or not boolean.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            "True" => Some(true),
            "False" => Some(false),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        f.write_str(&parts.join(" "))
    }
}
