//! Staging error types.

/// Staging errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The command could not be started.
    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and failed.
    #[error("{command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// A local file must be uploaded but no staging server is configured.
    #[error("No staging server configured to upload {0}")]
    NoTransport(String),

    /// The local path has no file name.
    #[error("Invalid artifact path {0}")]
    InvalidPath(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
