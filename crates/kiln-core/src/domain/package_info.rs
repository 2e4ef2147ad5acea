use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Property key carrying the CMake package (config-file) name.
pub const CMAKE_FILE_NAME: &str = "cmake_file_name";
/// Property key carrying the namespaced CMake target name.
pub const CMAKE_TARGET_NAME: &str = "cmake_target_name";

/// What a consumer needs to find and link the packaged library.
///
/// Folders are relative to the package folder. Build-system identifiers are
/// stored as string properties so other generators can add their own keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub libs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self {
            libs: Vec::new(),
            include_dirs: vec!["include".into()],
            lib_dirs: vec!["lib".into()],
            bin_dirs: vec!["bin".into()],
            properties: BTreeMap::new(),
        }
    }
}

impl PackageInfo {
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn cmake_file_name(&self) -> Option<&str> {
        self.property(CMAKE_FILE_NAME)
    }

    pub fn cmake_target_name(&self) -> Option<&str> {
        self.property(CMAKE_TARGET_NAME)
    }
}
