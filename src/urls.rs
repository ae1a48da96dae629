use crate::error::CrawlError;
use url::Url;

/// Canonicalizes a URL for dedup and visited-set comparisons.
///
/// Strips the fragment and nothing else; two URLs that differ only in
/// fragment compare equal after normalization. Idempotent.
pub fn normalize(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

/// Parses an absolute URL string, e.g. the crawl root from the CLI.
pub fn parse_absolute(url: &str) -> Result<Url, CrawlError> {
    Url::parse(url).map_err(|source| CrawlError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Resolves a possibly-relative href against an absolute base URL.
///
/// Standard RFC 3986 joining: scheme/host inheritance, `.`/`..` segment
/// handling. Hrefs with non-HTTP schemes (`mailto:`, `javascript:`) resolve
/// successfully here and are left for the host/prefix filters to reject.
pub fn resolve(base: &Url, href: &str) -> Result<Url, CrawlError> {
    base.join(href).map_err(|source| CrawlError::MalformedHref {
        href: href.to_string(),
        source,
    })
}

/// Compares host components only; scheme and port are ignored, matching the
/// usual crawl-confinement intent.
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str()
}
