//! Board and test catalogs.
//!
//! Both catalogs are loaded once at startup and then only read.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    board::{Board, UserBoard},
    prelude::*,
};

/// User-provided board catalog, as found in `boards.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBoardCatalog {
    /// Boards keyed by identifier.
    #[serde(default)]
    pub boards: BTreeMap<String, UserBoard>,
}

impl UserBoardCatalog {
    /// Load the catalog from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }
    /// Parse the catalog from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }
}

/// Immutable mapping from board identifier to board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardCatalog {
    boards: BTreeMap<String, Board>,
}

impl BoardCatalog {
    /// Convert a user catalog to an internal catalog.
    pub fn from_user_catalog(catalog: UserBoardCatalog) -> Self {
        Self {
            boards: catalog
                .boards
                .into_iter()
                .map(|(id, board)| (id.clone(), Board::from_user_board(id, board)))
                .collect(),
        }
    }

    /// Load and convert a catalog file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let catalog = Self::from_user_catalog(UserBoardCatalog::from_file(file_path)?);
        info!(
            "Loaded {} boards from {}",
            catalog.len(),
            file_path.display()
        );
        Ok(catalog)
    }

    /// Parse and convert a catalog from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(Self::from_user_catalog(UserBoardCatalog::from_toml(value)?))
    }

    /// Look a board up. An unknown identifier is an error.
    pub fn get(&self, id: &str) -> Result<&Board> {
        self.boards
            .get(id)
            .ok_or_else(|| Error::UnknownBoard(id.to_string()))
    }

    /// Look up every requested board, in the requested order.
    ///
    /// Fails on the first unknown identifier, before anything is resolved.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&Board>> {
        ids.iter().map(|id| self.get(id.as_ref())).collect()
    }

    /// All boards, ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

/// Catalog entry describing how to run a test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Job template for this test.
    #[serde(default)]
    pub template: Option<String>,
    /// Job timeout in minutes.
    #[serde(default)]
    pub timeout: Option<u32>,
}

/// Known tests, as found in `tests.toml`.
///
/// The catalog is optional: an empty catalog validates nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCatalog {
    #[serde(default)]
    tests: BTreeMap<String, TestDefinition>,
}

impl TestCatalog {
    /// Load the catalog from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }
    /// Parse the catalog from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    pub fn get(&self, name: &str) -> Option<&TestDefinition> {
        self.tests.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tests.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARDS: &str = r#"
        [boards.armada-370-db]
        name = "Armada 370 DB"
        arch = "arm"
        dt = "armada-370-db"
        rootfs = "rootfs_armv7.cpio.gz"
        test_plan = "boot"
        configs = ["mainline/master/multi_v7_defconfig"]
        notify = ["maintainer@example.com"]

        [[boards.armada-370-db.tests]]
        name = "crypto"

        [[boards.armada-370-db.tests]]
        name = "crypto-tcrypt"
        configs = ["mvebu-backports/4.12-rc6_backports/mvebu_v7_defconfig+tcrypt"]
        template = "generic_simple_job_long_timeout.jinja"

        [boards.armada-3720-db]
        arch = "arm64"
        dt = "marvell/armada-3720-db"
        rootfs = "rootfs_aarch64.cpio.gz"
        test_plan = "boot-nfs"
        configs = ["mainline/master/defconfig"]
    "#;

    #[test]
    fn deserialize() -> Result<()> {
        let catalog = BoardCatalog::from_toml(BOARDS)?;
        assert_eq!(catalog.len(), 2);

        let board = catalog.get("armada-370-db")?;
        assert_eq!(board.name, "Armada 370 DB");
        assert_eq!(board.device_type, "armada-370-db");
        assert_eq!(board.tests.len(), 2);
        assert_eq!(
            board.tests[1].template.as_deref(),
            Some("generic_simple_job_long_timeout.jinja")
        );
        assert_eq!(board.tests[1].configs[0].defconfig, "mvebu_v7_defconfig+tcrypt");

        let board = catalog.get("armada-3720-db")?;
        assert_eq!(board.name, "armada-3720-db");
        assert!(board.tests.is_empty());
        assert!(board.notify.is_empty());
        Ok(())
    }

    #[test]
    fn unknown_board_is_an_error() {
        let catalog = BoardCatalog::from_toml(BOARDS).unwrap();
        assert!(matches!(
            catalog.select(&["armada-370-db", "beaglebone"]),
            Err(Error::UnknownBoard(id)) if id == "beaglebone"
        ));
    }

    #[test]
    fn malformed_config_fails_the_load() {
        let content = r#"
            [boards.broken]
            arch = "arm"
            dt = "broken"
            rootfs = "rootfs.cpio.gz"
            test_plan = "boot"
            configs = ["mainline/multi_v7_defconfig"]
        "#;
        assert!(BoardCatalog::from_toml(content).is_err());
    }

    #[test]
    fn test_catalog() -> Result<()> {
        let catalog = TestCatalog::from_toml(
            r#"
            [tests.boot]
            template = "generic_simple_job.jinja"
            timeout = 10

            [tests.network]
            template = "generic_multinode_job.jinja"
            "#,
        )?;
        assert!(catalog.contains("boot"));
        assert_eq!(catalog.get("boot").and_then(|t| t.timeout), Some(10));
        assert_eq!(catalog.get("network").and_then(|t| t.timeout), None);
        assert!(!catalog.contains("sata"));
        Ok(())
    }
}
