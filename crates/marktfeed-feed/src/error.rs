use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network, TLS, or timeout failure reaching the upstream feed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream feed answered with a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    UpstreamStatus { status: u16, url: String },

    /// The upstream body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing the target document failed.
    #[error("XML write error: {0}")]
    Write(#[from] std::io::Error),
}
