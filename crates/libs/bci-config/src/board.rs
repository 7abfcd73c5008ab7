//! Board definition types.

use serde::{Deserialize, Serialize};

use crate::build_config::BuildConfig;

/// Name of the test every board runs when it doesn't bind any.
pub const DEFAULT_TEST: &str = "boot";

/// A test a board declares support for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestBinding {
    /// Test name. Should match an entry of the test catalog.
    pub name: String,
    /// Build configurations to use for this test instead of the board defaults.
    #[serde(default)]
    pub configs: Vec<BuildConfig>,
    /// Job template to use instead of the default one.
    #[serde(default)]
    pub template: Option<String>,
}

impl TestBinding {
    /// A binding carrying nothing but a name.
    ///
    /// Used to run tests that the board doesn't declare.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configs: Vec::new(),
            template: None,
        }
    }
}

/// User-defined board. Usually loaded from the `boards.toml` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBoard {
    /// Human readable name. Defaults to the board identifier.
    #[serde(default)]
    pub name: Option<String>,
    /// The device-type the scheduler knows. Defaults to the board identifier.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Kernel architecture (`arm` or `arm64`).
    pub arch: String,
    /// Device tree name, without the `.dtb` extension. May contain a vendor directory.
    pub dt: String,
    /// Root filesystem image name, relative to the rootfs repository.
    pub rootfs: String,
    /// `boot` for ramdisk boots, `boot-nfs` when the board can't boot a ramdisk.
    pub test_plan: String,
    /// Default build configurations, in priority order.
    #[serde(default)]
    pub configs: Vec<BuildConfig>,
    /// Declared tests.
    #[serde(default)]
    pub tests: Vec<TestBinding>,
    /// Addresses notified of job results.
    #[serde(default)]
    pub notify: Vec<String>,
    /// Addresses notified when a job ends incomplete.
    #[serde(default)]
    pub notify_on_incomplete: Vec<String>,
}

/// Internal board with its identifier and defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Unique board identifier, the catalog key.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Scheduler-facing device type.
    pub device_type: String,
    /// Kernel architecture.
    pub arch: String,
    /// Device tree name.
    pub dt: String,
    /// Root filesystem image name.
    pub rootfs: String,
    /// Test plan, kept verbatim and validated when a job is assembled.
    pub test_plan: String,
    /// Default build configurations.
    pub configs: Vec<BuildConfig>,
    /// Declared tests.
    pub tests: Vec<TestBinding>,
    /// Addresses notified of job results.
    pub notify: Vec<String>,
    /// Addresses notified when a job ends incomplete.
    pub notify_on_incomplete: Vec<String>,
}

impl Board {
    /// Convert a user board to an internal board.
    pub fn from_user_board(id: impl Into<String>, board: UserBoard) -> Self {
        let id = id.into();
        Self {
            name: board.name.unwrap_or_else(|| id.clone()),
            device_type: board.device_type.unwrap_or_else(|| id.clone()),
            id,
            arch: board.arch,
            dt: board.dt,
            rootfs: board.rootfs,
            test_plan: board.test_plan,
            configs: board.configs,
            tests: board.tests,
            notify: board.notify,
            notify_on_incomplete: board.notify_on_incomplete,
        }
    }

    /// Find the binding declared for `test`. Matching is case-sensitive.
    pub fn binding(&self, test: &str) -> Option<&TestBinding> {
        self.tests.iter().find(|binding| binding.name == test)
    }

    /// Tests to run when the caller doesn't ask for specific ones.
    ///
    /// A board binding no test runs the default boot test.
    pub fn default_tests(&self) -> Vec<TestBinding> {
        if self.tests.is_empty() {
            vec![TestBinding::bare(DEFAULT_TEST)]
        } else {
            self.tests.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_board() -> UserBoard {
        UserBoard {
            name: None,
            device_type: None,
            arch: String::from("arm"),
            dt: String::from("armada-370-db"),
            rootfs: String::from("rootfs_armv7.cpio.gz"),
            test_plan: String::from("boot"),
            configs: vec!["mainline/master/multi_v7_defconfig".parse().unwrap()],
            tests: Vec::new(),
            notify: Vec::new(),
            notify_on_incomplete: Vec::new(),
        }
    }

    #[test]
    fn identifier_fills_missing_names() {
        let board = Board::from_user_board("armada-370-db", user_board());
        assert_eq!(board.name, "armada-370-db");
        assert_eq!(board.device_type, "armada-370-db");
    }

    #[test]
    fn explicit_names_are_kept() {
        let mut user = user_board();
        user.name = Some(String::from("Armada 370 DB"));
        user.device_type = Some(String::from("armada-370"));
        let board = Board::from_user_board("armada-370-db", user);
        assert_eq!(board.name, "Armada 370 DB");
        assert_eq!(board.device_type, "armada-370");
    }

    #[test]
    fn boards_without_tests_default_to_boot() {
        let board = Board::from_user_board("armada-370-db", user_board());
        assert_eq!(board.default_tests(), vec![TestBinding::bare(DEFAULT_TEST)]);
    }

    #[test]
    fn binding_lookup_is_case_sensitive() {
        let mut user = user_board();
        user.tests = vec![TestBinding::bare("crypto")];
        let board = Board::from_user_board("armada-370-db", user);
        assert!(board.binding("crypto").is_some());
        assert!(board.binding("Crypto").is_none());
    }
}
