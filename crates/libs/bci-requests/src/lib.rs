//! HTTP client library for artifact repositories and scheduler APIs.
//!
//! A thin wrapper around reqwest. Every request is relative to a base URL,
//! every non-success status is an error, and errors tell an answered request
//! from an unreachable server.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bci_requests::ApiClient;
//!
//! # async fn example() -> bci_requests::prelude::Result<()> {
//! let client = ApiClient::new("https://api.example.com")?;
//! let data: serde_json::Value = client.get("build").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod prelude;

use std::borrow::Borrow;

use reqwest::{RequestBuilder, Response, Url, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::prelude::*;

/// A text answer along with the headers callers care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Answer body.
    pub body: String,
    /// Raw `Last-Modified` header, if any.
    pub last_modified: Option<String>,
}

/// HTTP client for making API requests with JSON support.
#[derive(Debug, Clone)]
pub struct ApiClient {
    url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a new API client with the given base URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bci_requests::ApiClient;
    ///
    /// let client = ApiClient::new("https://api.example.com").unwrap();
    /// assert_eq!(client.path("build"), "https://api.example.com/build");
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_headers(url, std::iter::empty::<(&str, &str)>())
    }

    /// Creates a new API client sending `headers` with every request.
    ///
    /// # Arguments
    ///
    /// * `url` - Base URL every endpoint is relative to
    /// * `headers` - Header name and value pairs, e.g. an `Authorization` token
    pub fn with_headers<I, K, V>(url: impl Into<String>, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = header::HeaderMap::new();
        map.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        for (name, value) in headers {
            let name = name.as_ref();
            let key = header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.to_string()))?;
            let value = header::HeaderValue::from_str(value.as_ref())
                .map_err(|_| Error::InvalidHeader(name.to_string()))?;
            map.insert(key, value);
        }
        let client = reqwest::ClientBuilder::new()
            .default_headers(map)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            url: url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL, without trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Constructs the full URL path for an endpoint.
    pub fn path(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        if endpoint.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{endpoint}", self.url)
        }
    }

    fn parse(&self, endpoint: &str) -> Result<Url> {
        let path = self.path(endpoint);
        Url::parse(&path).map_err(|_| Error::InvalidUrl(path))
    }

    /// Send a request and turn non-success statuses into errors.
    async fn send(url: &Url, request: RequestBuilder) -> Result<Response> {
        debug!("Requesting {url}");
        let response = request.send().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn text(url: &Url, response: Response) -> Result<String> {
        response.text().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Checks that an endpoint exists with a `HEAD` request.
    pub async fn probe(&self, endpoint: &str) -> Result<()> {
        let url = self.parse(endpoint)?;
        Self::send(&url, self.client.head(url.clone())).await?;
        Ok(())
    }

    /// Makes a GET request and returns the answer as text.
    pub async fn get_text(&self, endpoint: &str) -> Result<Page> {
        let url = self.parse(endpoint)?;
        let response = Self::send(&url, self.client.get(url.clone())).await?;
        let last_modified = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        Ok(Page {
            body: Self::text(&url, response).await?,
            last_modified,
        })
    }

    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = Self::send(&url, self.client.get(url.clone())).await?;
        Ok(serde_json::from_str(&Self::text(&url, response).await?)?)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.parse(endpoint)?;
        self.get_url(url).await
    }

    /// Makes a GET request with query parameters. Keys may repeat.
    pub async fn get_with_params<T, I, K, V>(&self, endpoint: &str, params: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator,
        I::Item: Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = self.path(endpoint);
        let url = Url::parse_with_params(&path, params).map_err(|_| Error::InvalidUrl(path))?;
        self.get_url(url).await
    }

    /// Makes a POST request with a JSON body and deserializes the response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let url = self.parse(endpoint)?;
        let body = serde_json::to_string(body)?;
        let response = Self::send(&url, self.client.post(url.clone()).body(body)).await?;
        Ok(serde_json::from_str(&Self::text(&url, response).await?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_endpoints() {
        let client = ApiClient::new("http://farm.example.com/builds/").unwrap();
        assert_eq!(client.url(), "http://farm.example.com/builds");
        assert_eq!(
            client.path("/mainline/master/latest"),
            "http://farm.example.com/builds/mainline/master/latest"
        );
        assert_eq!(client.path(""), "http://farm.example.com/builds");
    }

    #[test]
    fn invalid_header_is_rejected() {
        let result = ApiClient::with_headers("http://example.com", [("Authori zation", "x")]);
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let client = ApiClient::new("not a url").unwrap();
        assert!(matches!(client.parse("latest"), Err(Error::InvalidUrl(_))));
    }
}
