//! Delivery error types.

use std::time::Duration;

/// Delivery errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The job could not be delivered. The batch goes on with the next job.
    #[error("{0}")]
    Unavailable(String),

    /// The scheduler rejected the credentials or could not be reached.
    #[error("Couldn't connect to scheduler {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: bci_requests::error::Error,
    },

    /// The scheduler address has no scheme or host.
    #[error("Invalid scheduler address {0}")]
    InvalidServer(String),

    /// The scheduler accepted the job but returned no id.
    #[error("Scheduler returned no job id")]
    NoJobId,

    /// The job was still pending when the polling deadline passed.
    #[error("Job {job} still pending after {waited:?}")]
    PollTimeout { job: String, waited: Duration },

    #[error(transparent)]
    Requests(#[from] bci_requests::error::Error),
}
