//! Kernel build configuration triples.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A kernel build to search for, written `tree/branch/defconfig` in catalogs.
///
/// Build farms replace any `/` of a branch name with `_`, so a valid triple
/// always has exactly three components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildConfig {
    /// Source tree, e.g. `mainline`.
    pub tree: String,
    /// Branch of the tree, e.g. `master`.
    pub branch: String,
    /// Kernel configuration, e.g. `multi_v7_defconfig`.
    pub defconfig: String,
}

impl BuildConfig {
    pub fn new(
        tree: impl Into<String>,
        branch: impl Into<String>,
        defconfig: impl Into<String>,
    ) -> Self {
        Self {
            tree: tree.into(),
            branch: branch.into(),
            defconfig: defconfig.into(),
        }
    }
}

impl FromStr for BuildConfig {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split('/').collect();
        match parts.as_slice() {
            [tree, branch, defconfig]
                if !tree.is_empty() && !branch.is_empty() && !defconfig.is_empty() =>
            {
                Ok(Self::new(*tree, *branch, *defconfig))
            }
            _ => Err(Error::InvalidBuildConfig(value.to_string())),
        }
    }
}

impl TryFrom<String> for BuildConfig {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BuildConfig> for String {
    fn from(value: BuildConfig) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.tree, self.branch, self.defconfig)
    }
}
