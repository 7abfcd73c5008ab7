//! Job assembly error types.

use std::path::PathBuf;

/// Job assembly errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The board test plan is neither `boot` nor `boot-nfs`.
    #[error("Invalid test_plan {test_plan} for board {board}")]
    InvalidTestPlan { board: String, test_plan: String },

    /// A mandatory job field is still empty once artifacts are merged.
    #[error("Job {job} has no {field}")]
    Incomplete { job: String, field: &'static str },

    /// The template file could not be read.
    #[error("Couldn't read template {path}: {source}")]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template is malformed or references a field jobs don't have.
    #[error("Couldn't render template {template}: {source}")]
    Template {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error(transparent)]
    Stage(#[from] bci_io::error::Error),
}
