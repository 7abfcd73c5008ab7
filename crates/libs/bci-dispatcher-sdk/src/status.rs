//! Device and job status classification.
//!
//! The scheduler reports a `health` and a `state` for devices and jobs. Only
//! a coarse status is kept: enough to decide whether to submit, and whether a
//! job is done.

use std::fmt;

/// Test device availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Idle,
    Running,
    Reserved,
    Offline,
    Retired,
}

impl DeviceStatus {
    /// Classify a device from its scheduler `health` and `state`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bci_dispatcher_sdk::status::DeviceStatus;
    ///
    /// assert_eq!(DeviceStatus::from_lava("Good", "Idle"), DeviceStatus::Idle);
    /// assert_eq!(DeviceStatus::from_lava("Maintenance", "Idle"), DeviceStatus::Offline);
    /// assert_eq!(DeviceStatus::from_lava("Retired", "Idle"), DeviceStatus::Retired);
    /// ```
    pub fn from_lava(health: &str, state: &str) -> Self {
        match (health, state) {
            ("Retired", _) => Self::Retired,
            ("Bad" | "Maintenance" | "Looping", _) => Self::Offline,
            (_, "Running") => Self::Running,
            (_, "Reserved") => Self::Reserved,
            _ => Self::Idle,
        }
    }

    /// `true` when jobs can't be sent to the device.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Offline | Self::Retired)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Reserved => "reserved",
            Self::Offline => "offline",
            Self::Retired => "retired",
        };
        write!(f, "{status}")
    }
}

/// Submitted job progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Running,
    Complete,
    Incomplete,
    Canceled,
    Canceling,
}

impl JobStatus {
    /// Classify a job from its scheduler `state` and `health`.
    pub fn from_lava(state: &str, health: &str) -> Self {
        match (state, health) {
            ("Running", _) => Self::Running,
            ("Canceling", _) => Self::Canceling,
            ("Finished", "Complete") => Self::Complete,
            ("Finished", "Canceled") => Self::Canceled,
            ("Finished", _) => Self::Incomplete,
            _ => Self::Submitted,
        }
    }

    /// `true` while the job hasn't reached a final status.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Submitted | Self::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Submitted => "Submitted",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Incomplete => "Incomplete",
            Self::Canceled => "Canceled",
            Self::Canceling => "Canceling",
        };
        write!(f, "{status}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_statuses() {
        assert_eq!(DeviceStatus::from_lava("Good", "Running"), DeviceStatus::Running);
        assert_eq!(DeviceStatus::from_lava("Unknown", "Reserved"), DeviceStatus::Reserved);
        assert_eq!(DeviceStatus::from_lava("Bad", "Idle"), DeviceStatus::Offline);
        assert_eq!(DeviceStatus::from_lava("Looping", "Running"), DeviceStatus::Offline);
        assert!(DeviceStatus::Retired.is_unavailable());
        assert!(!DeviceStatus::Reserved.is_unavailable());
        assert_eq!(DeviceStatus::Offline.to_string(), "offline");
    }

    #[test]
    fn job_statuses() {
        assert_eq!(JobStatus::from_lava("Submitted", "Unknown"), JobStatus::Submitted);
        assert_eq!(JobStatus::from_lava("Scheduled", "Unknown"), JobStatus::Submitted);
        assert_eq!(JobStatus::from_lava("Running", "Unknown"), JobStatus::Running);
        assert_eq!(JobStatus::from_lava("Finished", "Complete"), JobStatus::Complete);
        assert_eq!(JobStatus::from_lava("Finished", "Incomplete"), JobStatus::Incomplete);
        assert_eq!(JobStatus::from_lava("Finished", "Canceled"), JobStatus::Canceled);
        assert_eq!(JobStatus::from_lava("Canceling", "Unknown"), JobStatus::Canceling);
        assert!(JobStatus::Running.is_pending());
        assert!(!JobStatus::Canceling.is_pending());
    }
}
