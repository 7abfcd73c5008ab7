//! HTTP client error types.

/// HTTP client errors.
///
/// A request either reaches the server and gets a non-success answer
/// ([`Error::Status`]) or never gets an answer at all ([`Error::Transport`]).
/// Callers use the distinction to tell an empty remote from an unreachable one.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },

    /// The server could not be reached or the answer could not be read.
    #[error("{url} not accessible: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The URL could not be built.
    #[error("Invalid url {0}")]
    InvalidUrl(String),

    /// A default header could not be built.
    #[error("Invalid header {0}")]
    InvalidHeader(String),

    /// The client could not be built.
    #[error(transparent)]
    Client(#[from] reqwest::Error),

    /// The answer body is not the expected JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of the answer, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the server answered, whatever the status.
    pub fn is_status(&self) -> bool {
        self.status().is_some()
    }
}
