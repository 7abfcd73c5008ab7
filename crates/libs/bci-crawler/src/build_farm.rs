//! Primary build farm.
//!
//! Each branch directory holds a `latest` file naming the most recent release.

use async_trait::async_trait;

use crate::{
    prelude::*,
    repository::{Release, Repository},
    root::Root,
};

pub struct BuildFarm {
    root: Root,
}

impl BuildFarm {
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    /// Build farm rooted at `url`, which may be a `file://` URL.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(Root::parse(url)?))
    }
}

#[async_trait]
impl Repository for BuildFarm {
    fn name(&self) -> &str {
        "build farm"
    }

    fn root(&self) -> &Root {
        &self.root
    }

    async fn latest_release(&self, tree: &str, branch: &str) -> Result<Release> {
        let fetched = self
            .root
            .read(&format!("{tree}/{branch}/latest"), "Release page")
            .await?;
        let name = fetched.body.trim();
        if name.is_empty() {
            return Err(Error::RemoteEmpty(format!(
                "No release found for {tree}/{branch}"
            )));
        }
        Ok(Release {
            name: name.to_string(),
            created_on: fetched.modified,
        })
    }
}
