//! External command runner.

use std::{ffi::OsStr, process::Stdio};

use tokio::process::Command;
use tracing::debug;

use crate::prelude::*;

/// An external command, run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runner {
    /// Command to execute.
    command: String,
    /// Command line arguments.
    args: Vec<String>,
}

impl Runner {
    /// Create a new runner with command and arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bci_io::runner::Runner;
    ///
    /// let runner = Runner::new("scp", vec!["-P", "22", "zImage", "lab:/tmp/bci/ci/zImage"]);
    /// assert_eq!(runner.get_full_command(), "scp -P 22 zImage lab:/tmp/bci/ci/zImage");
    /// ```
    pub fn new(command: impl Into<String>, args: Vec<impl Into<String>>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(|a| a.into()).collect(),
        }
    }

    /// Get the full command string with arguments.
    pub fn get_full_command(&self) -> String {
        let mut full = self.command.clone();
        for arg in &self.args {
            full.push(' ');
            full.push_str(arg);
        }
        full
    }

    /// Run the command and wait for it.
    ///
    /// Standard input is closed so that the command can't block on a prompt.
    /// A non-zero exit status is an error carrying the command stderr.
    pub async fn run(&self) -> Result<()> {
        let command = self.get_full_command();
        debug!("Running {command}");
        let output = Command::new(OsStr::new(&self.command))
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_command() {
        assert!(Runner::new("true", Vec::<String>::new()).run().await.is_ok());
    }

    #[tokio::test]
    async fn failing_command_reports_stderr() {
        let result = Runner::new("sh", vec!["-c", "echo no route >&2; exit 3"])
            .run()
            .await;
        match result {
            Err(Error::CommandFailed { stderr, .. }) => assert_eq!(stderr, "no route"),
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_command_fails_to_spawn() {
        let result = Runner::new("bci-command-that-does-not-exist", Vec::<String>::new())
            .run()
            .await;
        assert!(matches!(result, Err(Error::Spawn { .. })));
    }
}
