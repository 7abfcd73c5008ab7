//! Artifact stager.
//!
//! Test devices can only boot artifacts they can reach. Remote references are
//! used as they are; local files are uploaded to a per-user directory of the
//! staging server first.

use std::path::Path;

use bci_config::settings::SshSettings;
use tracing::{info, warn};

use crate::{
    prelude::*,
    transport::{ScpTransport, Transport},
};

/// Schemes the test devices can read directly.
pub const REMOTE_SCHEMES: [&str; 3] = ["http://", "https://", "file://"];

/// Staging root used when none is configured.
pub const DEFAULT_STAGING_ROOT: &str = "/tmp/bci";

/// `true` if `reference` doesn't need staging.
pub fn is_remote(reference: &str) -> bool {
    REMOTE_SCHEMES
        .iter()
        .any(|scheme| reference.starts_with(scheme))
}

/// Uploads local artifacts to the staging server.
pub struct Stager {
    transport: Option<Box<dyn Transport>>,
    remote_root: String,
}

impl Stager {
    pub fn new(transport: Option<Box<dyn Transport>>, remote_root: impl Into<String>) -> Self {
        Self {
            transport,
            remote_root: remote_root.into().trim_end_matches('/').to_string(),
        }
    }

    /// Stager described by the `[ssh]` settings.
    ///
    /// Without a configured root, files go to `/tmp/bci/<user>`.
    pub fn from_settings(settings: &SshSettings) -> Self {
        let transport = ScpTransport::from_settings(settings)
            .map(|transport| Box::new(transport) as Box<dyn Transport>);
        let remote_root = settings
            .remote_root
            .clone()
            .unwrap_or_else(default_remote_root);
        Self::new(transport, remote_root)
    }

    /// `true` when local files can be uploaded.
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    pub fn remote_root(&self) -> &str {
        &self.remote_root
    }

    /// Make `reference` reachable by the test devices.
    ///
    /// Remote references are returned unchanged. Local files are copied to
    /// `{remote_root}/{file name}`, creating the remote directory and retrying
    /// once if the first copy fails, and returned as a `file://` reference.
    pub async fn stage(&self, reference: &str) -> Result<String> {
        if is_remote(reference) {
            return Ok(reference.to_string());
        }
        let Some(transport) = &self.transport else {
            return Err(Error::NoTransport(reference.to_string()));
        };
        let name = Path::new(reference)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidPath(reference.to_string()))?;
        let remote = format!("{}/{name}", self.remote_root);

        info!("Uploading {reference} to {remote}");
        if let Err(err) = transport.put(reference, &remote).await {
            warn!("Upload of {reference} failed ({err}), creating {}", self.remote_root);
            transport.mkdir_p(&self.remote_root).await?;
            transport.put(reference, &remote).await?;
        }
        Ok(format!("file://{remote}"))
    }
}

fn default_remote_root() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| String::from("bci"));
    format!("{DEFAULT_STAGING_ROOT}/{user}")
}
