//! Requirement declarations.
//!
//! A requirement names another package and a version constraint. Recipes only
//! *declare* requirements; picking concrete versions is left to whatever
//! resolver consumes the declared sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::validation::DomainValidator;

/// Version constraint attached to a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum VersionConstraint {
    /// Exact pin, e.g. `3.12.0`.
    Exact(String),
    /// Range expression, e.g. `[>=1.0 <2]`; stored without the brackets.
    Range(String),
    /// Any version (`*`).
    Any,
}

impl VersionConstraint {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(version) => f.write_str(version),
            Self::Range(expr) => write!(f, "[{expr}]"),
            Self::Any => f.write_str("*"),
        }
    }
}

impl FromStr for VersionConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(Self::Any);
        }
        if let Some(inner) = s.strip_prefix('[') {
            let expr = inner
                .strip_suffix(']')
                .ok_or_else(|| format!("range '{s}' is missing a closing ']'"))?
                .trim();
            if expr.is_empty() {
                return Err("range expression is empty".into());
            }
            return Ok(Self::Range(expr.to_string()));
        }
        DomainValidator::validate_version(s)?;
        Ok(Self::Exact(s.to_string()))
    }
}

/// Who needs a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// Needed only to perform this build (tools such as cmake).
    Build,
    /// Needed by the produced artifact to compile against or link.
    Host,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => f.write_str("build"),
            Self::Host => f.write_str("host"),
        }
    }
}

/// One declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub constraint: VersionConstraint,
    pub kind: RequirementKind,
}

impl Requirement {
    /// Parse a `name/constraint` reference.
    pub fn parse(reference: &str, kind: RequirementKind) -> DomainResult<Self> {
        let invalid = |reason: String| DomainError::InvalidRequirement {
            reference: reference.into(),
            reason,
        };

        let (name, constraint) = reference
            .split_once('/')
            .ok_or_else(|| invalid("expected 'name/version'".into()))?;

        DomainValidator::validate_package_name(name).map_err(invalid)?;
        let constraint = constraint.parse().map_err(invalid)?;

        Ok(Self {
            name: name.to_string(),
            constraint,
            kind,
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.constraint)
    }
}

/// Ordered requirement declarations of a single kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSet {
    kind: RequirementKind,
    items: Vec<Requirement>,
}

impl RequirementSet {
    pub fn new(kind: RequirementKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Declare `name/constraint`.
    ///
    /// Declaring an identical requirement again is a no-op; the same name
    /// with a different constraint is a conflict.
    pub fn add(&mut self, reference: &str) -> DomainResult<()> {
        let requirement = Requirement::parse(reference, self.kind)?;

        match self.items.iter().find(|r| r.name == requirement.name) {
            Some(existing) if existing.constraint == requirement.constraint => Ok(()),
            Some(existing) => Err(DomainError::ConflictingRequirement {
                name: requirement.name,
                existing: existing.constraint.to_string(),
                requested: requirement.constraint.to_string(),
            }),
            None => {
                self.items.push(requirement);
                Ok(())
            }
        }
    }

    pub fn kind(&self) -> RequirementKind {
        self.kind
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.items.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.items.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tool and host requirements of one recipe must not share a name.
    pub fn ensure_disjoint(build: &RequirementSet, host: &RequirementSet) -> DomainResult<()> {
        match build.iter().find(|r| host.contains(&r.name)) {
            Some(shared) => Err(DomainError::RequirementKindOverlap {
                name: shared.name.clone(),
            }),
            None => Ok(()),
        }
    }
}
