//! Crawler error types.

use crate::locator::RepositoryMiss;

/// Crawler errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The board architecture has no known kernel image name.
    #[error("Unknown architecture {0}")]
    UnknownArchitecture(String),

    /// The repository is reachable but doesn't have what was asked for.
    #[error("{0}")]
    RemoteEmpty(String),

    /// The repository could not be reached.
    #[error("{0}")]
    RemoteAccess(String),

    /// The latest release is older than the freshness window.
    #[error("Release {release} is {age_hours} hours old, no recent release found")]
    Stale { release: String, age_hours: u64 },

    /// No repository provides every artifact.
    #[error("No repository provides {config} for {board}")]
    Exhausted {
        board: String,
        config: String,
        misses: Vec<RepositoryMiss>,
    },

    /// The board root filesystem isn't available.
    #[error("Rootfs not available: {0}")]
    RootfsUnavailable(String),

    /// A repository URL is malformed.
    #[error("Invalid repository url {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Requests(#[from] bci_requests::error::Error),
}
