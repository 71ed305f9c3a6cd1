#![forbid(unsafe_code)]

//! Content payloads and the surfaces the widget draws into.

/// Content to present inside the lightbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<N> {
    /// Raw HTML text, parsed by the host on insertion.
    Html(String),
    /// An already-built node owned by the caller (e.g. a submitted form).
    Node(N),
}

impl<N> Content<N> {
    /// Wrap HTML text.
    pub fn html(html: impl Into<String>) -> Self {
        Self::Html(html.into())
    }
}

impl<N> From<String> for Content<N> {
    fn from(html: String) -> Self {
        Self::Html(html)
    }
}

impl<N> From<&str> for Content<N> {
    fn from(html: &str) -> Self {
        Self::Html(html.to_owned())
    }
}

/// Handles to the regions of the embedding page the widget manipulates.
///
/// The page owns these nodes; the widget only holds handles for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surfaces<N> {
    /// Full-viewport dimmed backdrop.
    pub overlay: N,
    /// Container the loaded content is inserted into.
    pub content: N,
    /// Frame wrapping the content container; the part that animates.
    pub inner: N,
    /// Root of the underlying page, hidden during mobile takeover.
    pub page: N,
    /// Textual loading indicator.
    pub loader: N,
}
