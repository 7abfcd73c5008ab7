//! Job writers.
//!
//! A writer delivers one rendered job and returns where it went: file paths
//! for [`FileWriter`], scheduler job ids for [`LavaWriter`]. The result is
//! always a list, even for a single job.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bci_config::Board;
use tracing::{error, info, warn};

use crate::{prelude::*, scheduler::Scheduler};

#[async_trait]
pub trait Writer: Send + Sync {
    async fn write(&self, board: &Board, name: &str, job: &str) -> Result<Vec<String>>;
}

/// Saves jobs as `{output_dir}/{name}.yaml`.
///
/// A name already saved by the same writer gets a numbered file,
/// `{name}-2.yaml` and so on, rather than replacing the earlier job.
#[derive(Debug)]
pub struct FileWriter {
    output_dir: PathBuf,
    written: Mutex<HashMap<String, usize>>,
}

impl FileWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            written: Mutex::new(HashMap::new()),
        }
    }

    fn file_name(&self, name: &str) -> String {
        let mut written = self
            .written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = written.entry(name.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return format!("{name}.yaml");
        }
        warn!("Job name {name} is used by several jobs, saving copy {count}");
        format!("{name}-{count}.yaml")
    }
}

#[async_trait]
impl Writer for FileWriter {
    async fn write(&self, _board: &Board, name: &str, job: &str) -> Result<Vec<String>> {
        let out = self.output_dir.join(self.file_name(name));
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|err| {
                Error::Unavailable(format!(
                    "Couldn't create {}: {err}",
                    self.output_dir.display()
                ))
            })?;
        tokio::fs::write(&out, job)
            .await
            .map_err(|err| Error::Unavailable(format!("Couldn't save {}: {err}", out.display())))?;
        info!("Job saved to {}", out.display());
        Ok(vec![out.display().to_string()])
    }
}

/// Submits jobs to the scheduler, unless the board's device is offline.
pub struct LavaWriter {
    scheduler: Arc<dyn Scheduler>,
    web_ui_address: String,
}

impl LavaWriter {
    pub fn new(scheduler: Arc<dyn Scheduler>, web_ui_address: impl Into<String>) -> Self {
        Self {
            scheduler,
            web_ui_address: web_ui_address.into().trim_end_matches('/').to_string(),
        }
    }

    /// Scheduler job page.
    pub fn job_url(&self, id: &str) -> String {
        format!("{}/scheduler/job/{id}", self.web_ui_address)
    }
}

#[async_trait]
impl Writer for LavaWriter {
    async fn write(&self, board: &Board, name: &str, job: &str) -> Result<Vec<String>> {
        let hostname = format!("{}_01", board.device_type);
        let status = self.scheduler.device_status(&hostname).await.map_err(|err| {
            Error::Unavailable(format!("Couldn't get {hostname} status: {err}"))
        })?;
        if status.is_unavailable() {
            error!("Device {hostname} is {status}, not sending {name}");
            return Err(Error::Unavailable(format!("LAVA device {hostname} is {status}")));
        }

        let ids = self.scheduler.submit_job(job).await?;
        for id in &ids {
            info!("Job {name} submitted: {}", self.job_url(id));
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_writer_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("jobs/nested");
        let board = bci_config::BoardCatalog::from_toml(
            r#"
            [boards.beaglebone]
            arch = "arm"
            dt = "am335x-bone"
            rootfs = "rootfs_armv7.cpio.gz"
            test_plan = "boot"
            "#,
        )
        .unwrap();

        let written = FileWriter::new(&output)
            .write(board.get("beaglebone").unwrap(), "bone--boot", "job: text\n")
            .await
            .unwrap();

        let expected = output.join("bone--boot.yaml");
        assert_eq!(written, vec![expected.display().to_string()]);
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "job: text\n");
    }

    #[tokio::test]
    async fn same_name_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let boards = bci_config::BoardCatalog::from_toml(
            r#"
            [boards.armada-370-db]
            arch = "arm"
            dt = "armada-370-db"
            rootfs = "rootfs_armv7.cpio.gz"
            test_plan = "boot"
            "#,
        )
        .unwrap();
        let board = boards.get("armada-370-db").unwrap();
        let name = "armada-370-db--mainline--multi_v7_defconfig--boot";
        let writer = FileWriter::new(dir.path());

        let master = writer.write(board, name, "branch: master\n").await.unwrap();
        let next = writer.write(board, name, "branch: next\n").await.unwrap();

        assert_ne!(master, next);
        assert_eq!(
            next,
            vec![dir.path().join(format!("{name}-2.yaml")).display().to_string()]
        );
        assert_eq!(std::fs::read_to_string(&master[0]).unwrap(), "branch: master\n");
        assert_eq!(std::fs::read_to_string(&next[0]).unwrap(), "branch: next\n");
    }
}
