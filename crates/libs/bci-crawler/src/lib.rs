//! Artifact repositories crawling for BCI.
//!
//! Finds the kernel image, device tree blob, modules archive and root
//! filesystem a board needs to boot a given build configuration.
//!
//! Repositories are tried in priority order:
//!
//! - **Build farm**: the primary repository, HTTP or `file://`, each branch
//!   directory holding a `latest` file.
//! - **KernelCI**: the public aggregator, queried through its API.
//!
//! A repository that is reachable but has no usable build yields a
//! remote-empty miss, an unreachable one a remote-access miss. Releases older
//! than the freshness window count as remote-empty.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bci_config::{BoardCatalog, BuildConfig, Settings};
//! use bci_crawler::Locator;
//!
//! # async fn example(catalog: BoardCatalog, settings: Settings) -> bci_crawler::prelude::Result<()> {
//! let locator = Locator::from_settings(&settings)?;
//! let board = catalog.get("armada-370-db").unwrap();
//! let config = BuildConfig::new("mainline", "master", "multi_v7_defconfig");
//! let located = locator.resolve(board, &config).await?;
//! println!("kernel at {}", located.artifacts.kernel);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod build_farm;
pub mod error;
pub mod kernelci;
pub mod locator;
pub mod prelude;
pub mod repository;
pub mod root;
pub mod rootfs;

pub use artifacts::ArtifactSet;
pub use locator::{Located, Locator, MissKind, RepositoryMiss};
pub use repository::{Release, Repository};
