//! Job completion polling.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::{prelude::*, scheduler::Scheduler, status::JobStatus};

/// Default delay between two status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    /// Give up once this much time has passed. `None` waits forever.
    pub deadline: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

/// Wait for job `id` to leave the `Submitted` and `Running` statuses.
///
/// # Returns
///
/// The final status, or [`Error::PollTimeout`] once the deadline passes.
pub async fn poll_job(scheduler: &dyn Scheduler, id: &str, options: PollOptions) -> Result<JobStatus> {
    let started = Instant::now();
    loop {
        let status = scheduler.job_status(id).await?;
        if !status.is_pending() {
            info!("Job {id} finished: {status}");
            return Ok(status);
        }

        let waited = started.elapsed();
        if options.deadline.is_some_and(|deadline| waited >= deadline) {
            return Err(Error::PollTimeout {
                job: id.to_string(),
                waited,
            });
        }
        debug!("Job {id} is {status}, checking again in {:?}", options.interval);
        sleep(options.interval).await;
    }
}
