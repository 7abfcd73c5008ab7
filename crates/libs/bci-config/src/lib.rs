//! Configuration management for BCI.
//!
//! Provides the board catalog, the optional test catalog and the launcher
//! settings. All of them are plain values, loaded once and passed to the
//! components that need them.
//!
//! # Usage
//!
//! ```rust
//! use bci_config::BoardCatalog;
//!
//! let catalog = BoardCatalog::from_toml(r#"
//!     [boards.armada-370-db]
//!     arch = "arm"
//!     dt = "armada-370-db"
//!     rootfs = "rootfs_armv7.cpio.gz"
//!     test_plan = "boot"
//!     configs = ["mainline/master/multi_v7_defconfig"]
//! "#).unwrap();
//!
//! let board = catalog.get("armada-370-db").unwrap();
//! assert_eq!(board.configs[0].defconfig, "multi_v7_defconfig");
//! ```

pub mod board;
pub mod build_config;
pub mod catalog;
pub mod error;
pub mod prelude;
pub mod settings;

pub use board::{Board, DEFAULT_TEST, TestBinding};
pub use build_config::BuildConfig;
pub use catalog::{BoardCatalog, TestCatalog, TestDefinition};
pub use settings::Settings;
