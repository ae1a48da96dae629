use thiserror::Error;
use url::Url;

/// Errors produced while configuring or running a crawl.
///
/// Per-page failures (`Fetch`, `NotFound`, `HttpStatus`, `NotInterested`,
/// `MalformedHref`) never abort a crawl; workers log them and move on.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("malformed href {href:?}: {source}")]
    MalformedHref {
        href: String,
        source: url::ParseError,
    },

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("not found: {0}")]
    NotFound(Url),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: Url,
    },

    #[error("not interested in content of type {content_type} at {url}")]
    NotInterested { content_type: String, url: Url },

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
