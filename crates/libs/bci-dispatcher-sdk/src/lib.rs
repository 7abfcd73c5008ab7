//! Job delivery for BCI.
//!
//! Rendered jobs are either saved to files ([`writer::FileWriter`]) or
//! submitted to a LAVA scheduler ([`writer::LavaWriter`]), which can then be
//! polled until the jobs end ([`poll::poll_job`]).
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bci_dispatcher_sdk::{poll::{PollOptions, poll_job}, scheduler::LavaClient, writer::{LavaWriter, Writer}};
//!
//! # async fn example(board: bci_config::Board, job: String) -> bci_dispatcher_sdk::prelude::Result<()> {
//! let client = Arc::new(LavaClient::connect("https://lava.example.com", "ci", "token").await?);
//! let writer = LavaWriter::new(client.clone(), "https://lava.example.com");
//! for id in writer.write(&board, "beaglebone--custom_kernel--boot", &job).await? {
//!     poll_job(client.as_ref(), &id, PollOptions::default()).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod poll;
pub mod prelude;
pub mod scheduler;
pub mod status;
pub mod writer;

pub use poll::{PollOptions, poll_job};
pub use scheduler::{LavaClient, Scheduler};
pub use status::{DeviceStatus, JobStatus};
pub use writer::{FileWriter, LavaWriter, Writer};
