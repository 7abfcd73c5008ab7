//! Ordered job descriptor builder.
//!
//! Each step consumes the builder and returns the next state, so fields can
//! only be filled in order: connection, board, notifications, artifacts,
//! test, name.

use bci_config::Board;
use bci_crawler::ArtifactSet;

use crate::{
    descriptor::{JobDescriptor, RootfsType},
    prelude::*,
};

/// Scheduler connection metadata is set.
pub struct Connection {
    lava_server: String,
    lava_stream: String,
}
/// Rootfs type and device identity are set.
pub struct Device(JobDescriptor);
/// Notification recipients are set.
pub struct Notified(JobDescriptor);
/// Artifact references are set.
pub struct WithArtifacts(JobDescriptor);
/// Test name and timeout are set.
pub struct WithTest(JobDescriptor);

pub struct JobBuilder<S> {
    state: S,
}

impl JobBuilder<Connection> {
    /// Start a job. Missing connection metadata is left blank.
    pub fn new(lava_server: Option<&str>, lava_stream: Option<&str>) -> Self {
        Self {
            state: Connection {
                lava_server: lava_server.unwrap_or_default().to_string(),
                lava_stream: lava_stream.unwrap_or_default().to_string(),
            },
        }
    }

    /// Set the rootfs type from the board test plan, then the device type.
    pub fn board(self, board: &Board) -> Result<JobBuilder<Device>> {
        let rootfs_type = RootfsType::from_test_plan(&board.id, &board.test_plan)?;
        Ok(JobBuilder {
            state: Device(JobDescriptor {
                kernel: String::new(),
                device_tree: String::new(),
                rootfs: String::new(),
                rootfs_type,
                modules: String::new(),
                test: String::new(),
                lava_server: self.state.lava_server,
                lava_stream: self.state.lava_stream,
                device_type: board.device_type.clone(),
                job_name: String::new(),
                notify: Vec::new(),
                notify_on_incomplete: Vec::new(),
                timeout: None,
            }),
        })
    }
}

impl JobBuilder<Device> {
    pub fn notify(self, notify: Vec<String>, on_incomplete: Vec<String>) -> JobBuilder<Notified> {
        let mut job = self.state.0;
        job.notify = notify;
        job.notify_on_incomplete = on_incomplete;
        JobBuilder {
            state: Notified(job),
        }
    }
}

impl JobBuilder<Notified> {
    pub fn artifacts(self, artifacts: ArtifactSet) -> JobBuilder<WithArtifacts> {
        let mut job = self.state.0;
        job.kernel = artifacts.kernel;
        job.device_tree = artifacts.dtb;
        job.rootfs = artifacts.rootfs;
        job.modules = artifacts.modules.unwrap_or_default();
        JobBuilder {
            state: WithArtifacts(job),
        }
    }
}

impl JobBuilder<WithArtifacts> {
    pub fn test(self, name: impl Into<String>, timeout: Option<u32>) -> JobBuilder<WithTest> {
        let mut job = self.state.0;
        job.test = name.into();
        job.timeout = timeout;
        JobBuilder {
            state: WithTest(job),
        }
    }
}

impl JobBuilder<WithTest> {
    /// Name the job and check that it's complete.
    pub fn name(self, job_name: impl Into<String>) -> Result<JobDescriptor> {
        let mut job = self.state.0;
        job.job_name = job_name.into();
        for (field, value) in [
            ("kernel", &job.kernel),
            ("device_tree", &job.device_tree),
            ("rootfs", &job.rootfs),
        ] {
            if value.is_empty() {
                return Err(Error::Incomplete {
                    job: job.job_name.clone(),
                    field,
                });
            }
        }
        Ok(job)
    }
}
