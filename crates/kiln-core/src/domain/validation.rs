use crate::domain::error::{DomainError, DomainResult};

/// Centralized naming rules for package references.
///
/// Descriptors and requirements share these so that anything a recipe can be
/// named is also something another recipe can require.
pub struct DomainValidator;

impl DomainValidator {
    /// Package names: lowercase ASCII, digits, `_ . + -`, 2..=101 chars,
    /// starting with a letter or digit.
    pub fn validate_package_name(name: &str) -> Result<(), String> {
        if !(2..=101).contains(&name.len()) {
            return Err(format!("name '{name}' must be 2 to 101 characters long"));
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(format!("name '{name}' must start with a lowercase letter or digit"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || "_.+-".contains(*c)))
        {
            return Err(format!("name '{name}' contains invalid character '{bad}'"));
        }
        Ok(())
    }

    /// Versions: non-empty, `[0-9A-Za-z.+-_]`, must start with an alphanumeric.
    pub fn validate_version(version: &str) -> Result<(), String> {
        if version.is_empty() {
            return Err("version is empty".into());
        }
        if !version.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(format!("version '{version}' must start with a letter or digit"));
        }
        if let Some(bad) = version
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || ".+-_".contains(*c)))
        {
            return Err(format!("version '{version}' contains invalid character '{bad}'"));
        }
        Ok(())
    }

    /// Descriptor-flavoured wrapper around [`Self::validate_package_name`].
    pub fn descriptor_name(name: &str) -> DomainResult<()> {
        Self::validate_package_name(name).map_err(DomainError::InvalidDescriptor)
    }

    /// Descriptor-flavoured wrapper around [`Self::validate_version`].
    pub fn descriptor_version(version: &str) -> DomainResult<()> {
        Self::validate_version(version).map_err(DomainError::InvalidDescriptor)
    }
}
