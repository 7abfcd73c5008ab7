//! Artifact staging for BCI.
//!
//! Uploads locally built artifacts to a staging server reachable by the test
//! devices, using the system `scp` and `ssh` commands.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bci_io::{stager::Stager, transport::ScpTransport};
//!
//! # async fn example() -> bci_io::prelude::Result<()> {
//! let transport = ScpTransport::new("lab.example.com", "ci", 22);
//! let stager = Stager::new(Some(Box::new(transport)), "/tmp/bci/ci");
//!
//! // Uploaded, returns file:///tmp/bci/ci/zImage
//! let kernel = stager.stage("out/arch/arm/boot/zImage").await?;
//! // Already reachable, returned as is
//! let dtb = stager.stage("http://farm.example.com/armada-370-db.dtb").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod prelude;
pub mod runner;
pub mod stager;
pub mod transport;
