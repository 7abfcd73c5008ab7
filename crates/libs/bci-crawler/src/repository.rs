//! Artifact repository interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{prelude::*, root::Root};

/// Latest build of a (tree, branch) pair on a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Release identifier, used as a directory name.
    pub name: String,
    /// When the release was published, if the repository tells.
    pub created_on: Option<DateTime<Utc>>,
}

/// A repository of kernel builds, laid out as
/// `{root}/{tree}/{branch}/{release}/{arch}/{defconfig}`.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Where the builds live.
    fn root(&self) -> &Root;

    /// Find the most recent release of `tree`/`branch`.
    ///
    /// Fails with [`Error::RemoteEmpty`] when the repository has no release,
    /// [`Error::RemoteAccess`] when it can't be queried.
    async fn latest_release(&self, tree: &str, branch: &str) -> Result<Release>;

    /// Build directory, relative to [`Repository::root`].
    fn base_path(
        &self,
        tree: &str,
        branch: &str,
        release: &Release,
        arch: &str,
        defconfig: &str,
    ) -> String {
        format!("{tree}/{branch}/{}/{arch}/{defconfig}", release.name)
    }

    /// Full reference to the build directory.
    fn base_url(
        &self,
        tree: &str,
        branch: &str,
        release: &Release,
        arch: &str,
        defconfig: &str,
    ) -> String {
        self.root()
            .reference(&self.base_path(tree, branch, release, arch, defconfig))
    }
}
