//! KernelCI aggregator.
//!
//! Releases are found through the KernelCI API, which needs an API token.
//! Builds are then fetched from the KernelCI storage.

use async_trait::async_trait;
use bci_requests::ApiClient;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    prelude::*,
    repository::{Release, Repository},
    root::Root,
};

#[derive(Debug, Deserialize)]
struct BuildQuery {
    #[serde(default)]
    result: Vec<BuildEntry>,
}

#[derive(Debug, Deserialize)]
struct BuildEntry {
    kernel: Option<String>,
    created_on: Option<MongoDate>,
}

/// Dates are exported as `{"$date": <milliseconds since epoch>}`.
#[derive(Debug, Deserialize)]
struct MongoDate {
    #[serde(rename = "$date")]
    date: i64,
}

pub struct KernelCi {
    api: ApiClient,
    storage: Root,
}

impl KernelCi {
    pub fn new(api: ApiClient, storage: Root) -> Self {
        Self { api, storage }
    }

    /// KernelCI client authenticating with `api_token`.
    pub fn from_urls(api_url: &str, storage_url: &str, api_token: &str) -> Result<Self> {
        let api = ApiClient::with_headers(api_url, [("Authorization", api_token)])?;
        Ok(Self::new(api, Root::parse(storage_url)?))
    }
}

#[async_trait]
impl Repository for KernelCi {
    fn name(&self) -> &str {
        "kernelci"
    }

    fn root(&self) -> &Root {
        &self.storage
    }

    async fn latest_release(&self, tree: &str, branch: &str) -> Result<Release> {
        let query: BuildQuery = self
            .api
            .get_with_params(
                "build",
                &[
                    ("limit", "1"),
                    ("job", tree),
                    ("field", "kernel"),
                    ("field", "created_on"),
                    ("sort", "created_on"),
                    ("git_branch", branch),
                ],
            )
            .await
            .map_err(|err| Error::RemoteAccess(format!("Release page not accessible: {err}")))?;

        let Some(entry) = query.result.into_iter().next() else {
            return Err(Error::RemoteEmpty(format!(
                "No release found for {tree}/{branch}"
            )));
        };
        let Some(name) = entry.kernel.filter(|name| !name.is_empty()) else {
            return Err(Error::RemoteEmpty(format!(
                "No release found for {tree}/{branch}"
            )));
        };
        Ok(Release {
            name,
            created_on: entry
                .created_on
                .and_then(|date| DateTime::<Utc>::from_timestamp_millis(date.date)),
        })
    }
}
