//! Transfers to the staging server.

use async_trait::async_trait;
use bci_config::settings::SshSettings;

use crate::{prelude::*, runner::Runner};

/// Copies files to a remote filesystem the test devices can read.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Copy `local` to the absolute remote path `remote`.
    async fn put(&self, local: &str, remote: &str) -> Result<()>;

    /// Create `dir` and its parents on the remote side.
    async fn mkdir_p(&self, dir: &str) -> Result<()>;
}

/// `scp`/`ssh` based transport, relying on the user's ssh configuration for
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScpTransport {
    server: String,
    username: String,
    port: u16,
}

impl ScpTransport {
    pub fn new(server: impl Into<String>, username: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            port,
        }
    }

    /// Transport described by the `[ssh]` settings, if a server is configured.
    pub fn from_settings(settings: &SshSettings) -> Option<Self> {
        match (&settings.server, &settings.username) {
            (Some(server), Some(username)) => Some(Self::new(server, username, settings.port)),
            _ => None,
        }
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.username, self.server)
    }

    fn put_runner(&self, local: &str, remote: &str) -> Runner {
        Runner::new(
            "scp",
            vec![
                String::from("-q"),
                String::from("-P"),
                self.port.to_string(),
                local.to_string(),
                format!("{}:{remote}", self.destination()),
            ],
        )
    }

    fn mkdir_runner(&self, dir: &str) -> Runner {
        Runner::new(
            "ssh",
            vec![
                String::from("-p"),
                self.port.to_string(),
                self.destination(),
                String::from("mkdir"),
                String::from("-p"),
                dir.to_string(),
            ],
        )
    }
}

#[async_trait]
impl Transport for ScpTransport {
    async fn put(&self, local: &str, remote: &str) -> Result<()> {
        self.put_runner(local, remote).run().await
    }

    async fn mkdir_p(&self, dir: &str) -> Result<()> {
        self.mkdir_runner(dir).run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands() {
        let transport = ScpTransport::new("lab.example.com", "ci", 2222);
        assert_eq!(
            transport
                .put_runner("out/zImage", "/tmp/bci/ci/zImage")
                .get_full_command(),
            "scp -q -P 2222 out/zImage ci@lab.example.com:/tmp/bci/ci/zImage"
        );
        assert_eq!(
            transport.mkdir_runner("/tmp/bci/ci").get_full_command(),
            "ssh -p 2222 ci@lab.example.com mkdir -p /tmp/bci/ci"
        );
    }

    #[test]
    fn from_settings_needs_server_and_user() {
        let mut settings = SshSettings::default();
        assert!(ScpTransport::from_settings(&settings).is_none());
        settings.server = Some(String::from("lab.example.com"));
        settings.username = Some(String::from("ci"));
        assert_eq!(
            ScpTransport::from_settings(&settings),
            Some(ScpTransport::new("lab.example.com", "ci", 22))
        );
    }
}
