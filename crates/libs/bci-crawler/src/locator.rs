//! Artifact locator.
//!
//! Asks every repository in turn for the latest build of a configuration and
//! checks that each artifact is really there. The first repository providing
//! all of them wins.

use std::time::Duration;

use bci_config::{Board, BuildConfig, Settings};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    artifacts::{ArtifactSet, MODULES_ARCHIVE, dtb_path, image_name},
    build_farm::BuildFarm,
    kernelci::KernelCi,
    prelude::*,
    repository::{Release, Repository},
    rootfs::RootfsChooser,
};

/// Why a repository couldn't provide a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    /// Reachable, but nothing to use.
    Empty,
    /// Not reachable.
    Access,
    /// Only a release older than the freshness window.
    Stale,
}

/// A repository that was tried and didn't provide a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMiss {
    pub repository: String,
    pub kind: MissKind,
    pub reason: String,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub artifacts: ArtifactSet,
    /// Repository that provided the build.
    pub repository: String,
    /// Release that was used.
    pub release: String,
    /// Repositories tried before, in priority order.
    pub misses: Vec<RepositoryMiss>,
}

/// Kernel artifacts found on one repository.
struct KernelArtifacts {
    release: String,
    kernel: String,
    modules: String,
    dtb: String,
}

pub struct Locator {
    repositories: Vec<Box<dyn Repository>>,
    rootfs: RootfsChooser,
    freshness: Duration,
}

impl Locator {
    /// Creates a locator trying `repositories` in order.
    pub fn new(
        repositories: Vec<Box<dyn Repository>>,
        rootfs: RootfsChooser,
        freshness: Duration,
    ) -> Self {
        Self {
            repositories,
            rootfs,
            freshness,
        }
    }

    /// The build farm first, then KernelCI when an API token is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut repositories: Vec<Box<dyn Repository>> =
            vec![Box::new(BuildFarm::from_url(&settings.build_farm.url)?)];
        match settings.kernelci.api_token.as_deref() {
            Some(token) => repositories.push(Box::new(KernelCi::from_urls(
                &settings.kernelci.api_url,
                &settings.kernelci.storage_url,
                token,
            )?)),
            None => warn!("No KernelCI API token, only the build farm will be crawled"),
        }
        Ok(Self::new(
            repositories,
            RootfsChooser::from_url(&settings.rootfs.url)?,
            settings.freshness(),
        ))
    }

    /// Resolve every artifact `board` needs to boot `config`.
    ///
    /// Never returns a partial set: either every artifact was found on a
    /// single repository, or the call fails.
    pub async fn resolve(&self, board: &Board, config: &BuildConfig) -> Result<Located> {
        let image = image_name(&board.arch)?;
        debug!(
            "Looking for artifacts for board {}, config {config}",
            board.id
        );

        let mut misses = Vec::new();
        for repository in &self.repositories {
            match self.crawl(repository.as_ref(), board, config, image).await {
                Ok(found) => {
                    let rootfs = self.rootfs.choose(board).await?;
                    info!(
                        "Found {config} release {} for {} on {}",
                        found.release,
                        board.id,
                        repository.name()
                    );
                    return Ok(Located {
                        artifacts: ArtifactSet {
                            kernel: found.kernel,
                            dtb: found.dtb,
                            modules: Some(found.modules),
                            rootfs,
                        },
                        repository: repository.name().to_string(),
                        release: found.release,
                        misses,
                    });
                }
                Err(err) => {
                    let kind = match err {
                        Error::RemoteEmpty(_) => MissKind::Empty,
                        Error::RemoteAccess(_) => MissKind::Access,
                        Error::Stale { .. } => MissKind::Stale,
                        other => return Err(other),
                    };
                    match kind {
                        MissKind::Access => warn!(
                            "{} unreachable for {} {config}: {err}",
                            repository.name(),
                            board.id
                        ),
                        _ => warn!(
                            "{} has nothing for {} {config}: {err}",
                            repository.name(),
                            board.id
                        ),
                    }
                    misses.push(RepositoryMiss {
                        repository: repository.name().to_string(),
                        kind,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(Error::Exhausted {
            board: board.id.clone(),
            config: config.to_string(),
            misses,
        })
    }

    async fn crawl(
        &self,
        repository: &dyn Repository,
        board: &Board,
        config: &BuildConfig,
        image: &str,
    ) -> Result<KernelArtifacts> {
        let release = repository
            .latest_release(&config.tree, &config.branch)
            .await?;
        self.check_freshness(&release)?;

        let base = repository.base_path(
            &config.tree,
            &config.branch,
            &release,
            &board.arch,
            &config.defconfig,
        );
        let root = repository.root();
        root.probe(&base, "Defconfig build").await?;

        let kernel = format!("{base}/{image}");
        root.probe(&kernel, "Kernel image").await?;
        let modules = format!("{base}/{MODULES_ARCHIVE}");
        root.probe(&modules, "Modules tarball").await?;
        let dtb = format!("{base}/{}", dtb_path(&board.dt));
        root.probe(&dtb, "Device Tree").await?;

        Ok(KernelArtifacts {
            kernel: root.reference(&kernel),
            modules: root.reference(&modules),
            dtb: root.reference(&dtb),
            release: release.name,
        })
    }

    fn check_freshness(&self, release: &Release) -> Result<()> {
        let Some(created_on) = release.created_on else {
            return Ok(());
        };
        // Releases dated in the future are considered fresh.
        let Ok(age) = (Utc::now() - created_on).to_std() else {
            return Ok(());
        };
        if age > self.freshness {
            return Err(Error::Stale {
                release: release.name.clone(),
                age_hours: age.as_secs() / 3600,
            });
        }
        Ok(())
    }
}
