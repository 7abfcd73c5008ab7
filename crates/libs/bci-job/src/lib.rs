//! Test job assembly for BCI.
//!
//! Turns a board, a test and a set of artifacts into rendered job text:
//!
//! - [`selection`] picks the tests, build configurations, template and
//!   timeout of each job.
//! - [`builder`] fills a [`descriptor::JobDescriptor`] in a fixed order.
//! - [`assembler`] merges overrides, stages local files and renders.
//! - [`render`] renders the Jinja job templates.

pub mod assembler;
pub mod builder;
pub mod descriptor;
pub mod error;
pub mod prelude;
pub mod render;
pub mod selection;

pub use assembler::{Candidates, JobAssembler, JobRequest, NotifyPolicy, Overrides, RenderedJob};
pub use descriptor::{JobDescriptor, RootfsType};
pub use render::{Render, TemplateDir};
