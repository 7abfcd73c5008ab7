//! Job descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// How the board mounts its root filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootfsType {
    /// Loaded in RAM, for `boot` test plans.
    #[serde(rename = "ramdisk")]
    Ramdisk,
    /// Mounted over NFS, for `boot-nfs` test plans.
    #[serde(rename = "nfsrootfs")]
    Nfs,
}

impl RootfsType {
    /// Derive the rootfs type from a board test plan.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bci_job::descriptor::RootfsType;
    ///
    /// assert_eq!(RootfsType::from_test_plan("beaglebone", "boot").unwrap(), RootfsType::Ramdisk);
    /// assert_eq!(RootfsType::from_test_plan("beaglebone", "boot-nfs").unwrap(), RootfsType::Nfs);
    /// assert!(RootfsType::from_test_plan("beaglebone", "netboot").is_err());
    /// ```
    pub fn from_test_plan(board: &str, test_plan: &str) -> Result<Self> {
        match test_plan {
            "boot" => Ok(Self::Ramdisk),
            "boot-nfs" => Ok(Self::Nfs),
            other => Err(Error::InvalidTestPlan {
                board: board.to_string(),
                test_plan: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RootfsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ramdisk => write!(f, "ramdisk"),
            Self::Nfs => write!(f, "nfsrootfs"),
        }
    }
}

/// Everything a job template may reference.
///
/// Only built through [`crate::builder::JobBuilder`], which fills the fields
/// in order and checks that kernel, device tree and rootfs are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    pub kernel: String,
    pub device_tree: String,
    pub rootfs: String,
    pub rootfs_type: RootfsType,
    /// Empty when the job has no modules archive.
    pub modules: String,
    pub test: String,
    pub lava_server: String,
    pub lava_stream: String,
    pub device_type: String,
    pub job_name: String,
    pub notify: Vec<String>,
    pub notify_on_incomplete: Vec<String>,
    /// Job timeout in minutes.
    pub timeout: Option<u32>,
}
