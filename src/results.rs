use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Kinds of links a page can carry.
///
/// Anchor hrefs are the only kind extracted today; the enum is open for
/// future kinds (img src, form action, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LinkKind {
    Href,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Href => write!(f, "href"),
        }
    }
}

/// One directed edge of the link graph.
///
/// Equality is structural on all three fields; the crawl state keeps at most
/// one instance per distinct `(src, dst, kind)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub src: String,
    pub dst: String,
    pub kind: LinkKind,
}

impl Link {
    pub fn new(src: &Url, dst: &Url, kind: LinkKind) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

/// Read-only snapshot of a finished crawl.
#[derive(Debug, Clone)]
pub struct CrawlResults {
    /// Every normalized link target observed on any page, crawled or not.
    pub urls_seen: HashSet<Url>,

    /// Every page URL actually fetched.
    pub visited_urls: HashSet<Url>,

    /// URLs that passed the save filters; the crawl's primary output.
    pub saved_urls: HashSet<Url>,

    /// The link graph: one edge per unique `(src, dst, kind)` triple.
    pub links_remembered: HashSet<Link>,

    /// Number of save-filter acceptances (counts duplicates).
    pub num_links_found: usize,

    /// Number of pages followed through the pre-visit filters.
    pub num_pages_followed: usize,
}
