//! Launcher settings, loaded from the user's settings file.
//!
//! Every section is optional in the file; [`Settings::validate_ci`] and
//! [`Settings::validate_custom`] check that what the selected mode needs is there.

use std::{path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Default freshness window for releases found on artifact repositories.
pub const DEFAULT_FRESHNESS_HOURS: u64 = 24;

/// Remote test scheduler (LAVA) access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Scheduler URL, e.g. `https://lava.example.com`.
    pub server: Option<String>,
    /// Scheduler user name.
    pub username: Option<String>,
    /// Scheduler API token.
    pub token: Option<String>,
    /// Result stream, only used by legacy templates.
    pub stream: Option<String>,
    /// Web UI base address, used to print job links. Defaults to `server`.
    pub web_ui_address: Option<String>,
}

/// KernelCI aggregator access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelCiSettings {
    /// API token, sent as the `Authorization` header.
    pub api_token: Option<String>,
    /// API root used to find the latest builds.
    pub api_url: String,
    /// Storage root holding the build artifacts.
    pub storage_url: String,
}

impl Default for KernelCiSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            api_url: String::from("https://api.kernelci.org"),
            storage_url: String::from("https://storage.kernelci.org"),
        }
    }
}

/// Primary build farm. `file://` roots are read from the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildFarmSettings {
    pub url: String,
}

impl Default for BuildFarmSettings {
    fn default() -> Self {
        Self {
            url: String::from("http://lava.free-electrons.com/downloads/builds"),
        }
    }
}

/// Root filesystem images repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootfsSettings {
    pub url: String,
}

impl Default for RootfsSettings {
    fn default() -> Self {
        Self {
            url: String::from("http://lava.free-electrons.com/downloads/rootfs"),
        }
    }
}

/// Staging server reachable by the test devices, used for local artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshSettings {
    pub server: Option<String>,
    pub username: Option<String>,
    pub port: u16,
    /// Staging root. Defaults to a per-user directory under `/tmp/bci`.
    pub remote_root: Option<String>,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            server: None,
            username: None,
            port: 22,
            remote_root: None,
        }
    }
}

/// Notification recipients used when board defaults aren't requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub recipients: Vec<String>,
    pub on_incomplete: Vec<String>,
}

/// Where jobs and templates live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Directory receiving job files when they aren't sent.
    pub output_dir: PathBuf,
    /// Directory holding the job templates.
    pub templates_dir: PathBuf,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("jobs"),
            templates_dir: PathBuf::from("jobs_templates"),
        }
    }
}

/// Launcher settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scheduler: SchedulerSettings,
    pub kernelci: KernelCiSettings,
    pub build_farm: BuildFarmSettings,
    pub rootfs: RootfsSettings,
    pub ssh: SshSettings,
    pub notify: NotifySettings,
    pub jobs: JobSettings,
    /// Releases older than this many hours are ignored.
    pub freshness_hours: Option<u64>,
}

fn require<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingSetting(key)),
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }
    /// Parse settings from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Freshness window applied to repository releases.
    pub fn freshness(&self) -> Duration {
        let hours = self.freshness_hours.unwrap_or(DEFAULT_FRESHNESS_HOURS);
        Duration::from_secs(hours.saturating_mul(60 * 60))
    }

    /// Check the settings needed by a CI run.
    ///
    /// The aggregator token is always needed; scheduler credentials only when
    /// jobs are sent.
    pub fn validate_ci(&self, send: bool) -> Result<()> {
        require(&self.kernelci.api_token, "kernelci.api_token")?;
        if send {
            self.validate_scheduler()?;
        }
        Ok(())
    }

    /// Check the settings needed by a custom run.
    ///
    /// `stage` tells whether some artifact is a local file that has to be
    /// uploaded to the staging server.
    pub fn validate_custom(&self, send: bool, stage: bool) -> Result<()> {
        if stage {
            require(&self.ssh.server, "ssh.server")?;
            require(&self.ssh.username, "ssh.username")?;
        }
        if send {
            self.validate_scheduler()?;
        }
        Ok(())
    }

    fn validate_scheduler(&self) -> Result<()> {
        self.scheduler_credentials().map(|_| ())
    }

    /// Scheduler server, username and token.
    pub fn scheduler_credentials(&self) -> Result<(&str, &str, &str)> {
        Ok((
            require(&self.scheduler.server, "scheduler.server")?,
            require(&self.scheduler.username, "scheduler.username")?,
            require(&self.scheduler.token, "scheduler.token")?,
        ))
    }

    /// Web UI base address, falling back to the scheduler URL.
    pub fn web_ui_address(&self) -> Option<&str> {
        self.scheduler
            .web_ui_address
            .as_deref()
            .or(self.scheduler.server.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() -> Result<()> {
        let settings = Settings::from_toml("")?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.freshness(), Duration::from_secs(24 * 60 * 60));
        assert_eq!(settings.ssh.port, 22);
        assert_eq!(settings.jobs.output_dir, PathBuf::from("jobs"));
        assert_eq!(settings.kernelci.api_url, "https://api.kernelci.org");
        Ok(())
    }

    #[test]
    fn huge_freshness_saturates() -> Result<()> {
        let settings = Settings::from_toml(&format!("freshness_hours = {}", i64::MAX))?;
        assert_eq!(settings.freshness(), Duration::from_secs(u64::MAX));
        Ok(())
    }

    #[test]
    fn deserialize() -> Result<()> {
        let settings = Settings::from_toml(
            r#"
            freshness_hours = 12

            [scheduler]
            server = "https://lava.example.com"
            username = "ci"
            token = "secret"

            [kernelci]
            api_token = "kci-token"

            [notify]
            recipients = ["ci@example.com"]
            "#,
        )?;
        assert_eq!(settings.freshness(), Duration::from_secs(12 * 60 * 60));
        assert_eq!(settings.web_ui_address(), Some("https://lava.example.com"));
        assert_eq!(settings.notify.recipients, vec!["ci@example.com"]);
        settings.validate_ci(true)?;
        Ok(())
    }

    #[test]
    fn ci_requires_api_token() {
        let settings = Settings::default();
        assert!(matches!(
            settings.validate_ci(false),
            Err(Error::MissingSetting("kernelci.api_token"))
        ));
    }

    #[test]
    fn sending_requires_scheduler_credentials() {
        let mut settings = Settings::default();
        settings.kernelci.api_token = Some(String::from("token"));
        settings.scheduler.server = Some(String::from("https://lava.example.com"));
        settings.scheduler.username = Some(String::from("ci"));
        settings.scheduler.token = Some(String::from("  "));
        assert!(settings.validate_ci(false).is_ok());
        assert!(matches!(
            settings.validate_ci(true),
            Err(Error::MissingSetting("scheduler.token"))
        ));
    }

    #[test]
    fn staging_requires_ssh() {
        let settings = Settings::default();
        assert!(settings.validate_custom(false, false).is_ok());
        assert!(matches!(
            settings.validate_custom(false, true),
            Err(Error::MissingSetting("ssh.server"))
        ));
    }
}
