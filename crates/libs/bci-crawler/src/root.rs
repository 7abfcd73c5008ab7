//! Repository roots, either served over HTTP or mounted on the local filesystem.

use std::path::{Path, PathBuf};

use bci_requests::ApiClient;
use chrono::{DateTime, Utc};

use crate::prelude::*;

const FILE_SCHEME: &str = "file://";

/// A text file read from a repository, with its modification time when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub body: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Where a repository lives.
#[derive(Debug, Clone)]
pub enum Root {
    /// Served over HTTP(S).
    Http(ApiClient),
    /// Local directory, given as a `file://` URL.
    Local(PathBuf),
}

impl Root {
    /// Build a root from a URL. `file://` URLs are read from the filesystem.
    pub fn parse(url: &str) -> Result<Self> {
        Self::with_headers(url, std::iter::empty::<(&str, &str)>())
    }

    /// Build a root sending `headers` with every HTTP request.
    pub fn with_headers<I, K, V>(url: &str, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if let Some(path) = url.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(Error::InvalidUrl(url.to_string()));
            }
            return Ok(Self::Local(PathBuf::from(path)));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidUrl(url.to_string()));
        }
        Ok(Self::Http(ApiClient::with_headers(url, headers)?))
    }

    /// Reference to `endpoint` as it appears in a job.
    pub fn reference(&self, endpoint: &str) -> String {
        match self {
            Self::Http(client) => client.path(endpoint),
            Self::Local(path) => format!("{FILE_SCHEME}{}", local_path(path, endpoint).display()),
        }
    }

    /// Check that `endpoint` exists.
    ///
    /// A missing file or a non-success answer is [`Error::RemoteEmpty`]; an
    /// unreachable host or unreadable filesystem is [`Error::RemoteAccess`].
    pub async fn probe(&self, endpoint: &str, what: &str) -> Result<()> {
        match self {
            Self::Http(client) => client
                .probe(endpoint)
                .await
                .map_err(|err| classify(err, what)),
            Self::Local(root) => {
                let path = local_path(root, endpoint);
                tokio::fs::metadata(&path)
                    .await
                    .map(|_| ())
                    .map_err(|err| classify_io(err, &path, what))
            }
        }
    }

    /// Read a text file.
    ///
    /// Classified like [`Root::probe`]: a missing file or a non-success answer
    /// is [`Error::RemoteEmpty`], anything else is [`Error::RemoteAccess`].
    pub async fn read(&self, endpoint: &str, what: &str) -> Result<Fetched> {
        match self {
            Self::Http(client) => {
                let page = client
                    .get_text(endpoint)
                    .await
                    .map_err(|err| classify(err, what))?;
                let modified = page
                    .last_modified
                    .as_deref()
                    .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
                    .map(|date| date.with_timezone(&Utc));
                Ok(Fetched {
                    body: page.body,
                    modified,
                })
            }
            Self::Local(root) => {
                let path = local_path(root, endpoint);
                let body = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|err| classify_io(err, &path, what))?;
                let modified = tokio::fs::metadata(&path)
                    .await
                    .and_then(|metadata| metadata.modified())
                    .ok()
                    .map(DateTime::<Utc>::from);
                Ok(Fetched { body, modified })
            }
        }
    }
}

fn local_path(root: &Path, endpoint: &str) -> PathBuf {
    let endpoint = endpoint.trim_start_matches('/');
    if endpoint.is_empty() {
        root.to_path_buf()
    } else {
        root.join(endpoint)
    }
}

/// Map an HTTP failure onto the crawler taxonomy.
pub(crate) fn classify(err: bci_requests::error::Error, what: &str) -> Error {
    if err.is_status() {
        Error::RemoteEmpty(format!("{what} not available: {err}"))
    } else {
        Error::RemoteAccess(format!("{what} not accessible: {err}"))
    }
}

/// Map a filesystem failure onto the crawler taxonomy.
fn classify_io(err: std::io::Error, path: &Path, what: &str) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::RemoteEmpty(format!("{what} not available: {}", path.display()))
    } else {
        Error::RemoteAccess(format!("{what} not accessible: {}: {err}", path.display()))
    }
}
