#![forbid(unsafe_code)]

//! Remote content requests.
//!
//! # Merge rules
//!
//! [`FetchRequest::merge`] lets callers extend a base request but never
//! override the parts that make it a lightbox request:
//!
//! | Field | Caller may |
//! |-------|------------|
//! | `url` | nothing |
//! | `response_type` | nothing |
//! | `headers` | add names the base does not set (case-insensitive) |
//! | `query` | append |
//! | `timeout` | set |
//! | `with_credentials` | set |

use std::fmt;
use std::time::Duration;

/// Header marking a request as lightbox content, so the server can omit the page chrome.
pub const LIGHTBOX_HEADER: &str = "is-lightbox-content";

/// Expected response body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Html,
    Text,
}

/// A GET request handed to [`Fetch`](crate::Fetch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub response_type: ResponseType,
    pub timeout: Option<Duration>,
    pub with_credentials: bool,
}

impl FetchRequest {
    /// Base request for lightbox content at `url`.
    pub fn lightbox(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: vec![(LIGHTBOX_HEADER.to_owned(), "true".to_owned())],
            query: Vec::new(),
            response_type: ResponseType::Html,
            timeout: None,
            with_credentials: false,
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Extend this request with caller options.
    #[must_use]
    pub fn merge(mut self, options: RequestOptions) -> Self {
        for (name, value) in options.headers {
            if self.header(&name).is_none() {
                self.headers.push((name, value));
            }
        }
        self.query.extend(options.query);
        if options.timeout.is_some() {
            self.timeout = options.timeout;
        }
        if let Some(with_credentials) = options.with_credentials {
            self.with_credentials = with_credentials;
        }
        self
    }
}

/// Caller-supplied extensions to a content request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub with_credentials: Option<bool>,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set a request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send cookies with cross-origin requests.
    #[must_use]
    pub fn with_credentials(mut self, value: bool) -> Self {
        self.with_credentials = Some(value);
        self
    }
}

/// Errors reported by a [`Fetch`](crate::Fetch) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    Status(u16),
    /// The request never produced a response.
    Network(String),
    /// The configured timeout elapsed.
    Timeout,
    /// The host aborted the request.
    Aborted,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "server responded with status {code}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Timeout => f.write_str("request timed out"),
            Self::Aborted => f.write_str("request aborted"),
        }
    }
}

impl std::error::Error for FetchError {}
