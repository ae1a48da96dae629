use crate::results::{CrawlResults, Link, LinkKind};
use std::collections::HashSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Shared, concurrently-mutated record of one crawl.
///
/// Every container is lock-guarded and every insertion reports whether the
/// value was new, so races between workers are decided atomically (first
/// writer wins). Workers mutate this for the duration of the crawl; once the
/// pool drains, `snapshot` produces the read-only results and nothing
/// mutates the state afterwards.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Link targets observed on any page, used for frontier dedup.
    seen: RwLock<HashSet<Url>>,

    /// Page URLs actually fetched.
    visited: RwLock<HashSet<Url>>,

    /// URLs that passed the save filters.
    saved: RwLock<HashSet<Url>>,

    /// Edges that passed the save filters, one per unique triple.
    links: RwLock<HashSet<Link>>,

    links_found: AtomicUsize,
    pages_followed: AtomicUsize,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link target as seen. Returns true if it was not seen
    /// before, i.e. the caller won the race to enqueue it.
    pub fn mark_seen(&self, url: &Url) -> bool {
        self.seen
            .write()
            .expect("seen lock poisoned")
            .insert(url.clone())
    }

    /// Records a page as visited and counts it as followed.
    pub fn mark_visited(&self, url: &Url) {
        self.visited
            .write()
            .expect("visited lock poisoned")
            .insert(url.clone());
        self.pages_followed.fetch_add(1, Ordering::Relaxed);
    }

    /// Used by the not-visited pre-visit filter.
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited
            .read()
            .expect("visited lock poisoned")
            .contains(url)
    }

    /// Records a link that passed the save filters.
    ///
    /// The found counter ticks on every acceptance; the set insertions are
    /// idempotent, so a duplicate edge is otherwise a no-op.
    pub fn record_saved(&self, src: &Url, dst: &Url) {
        self.links_found.fetch_add(1, Ordering::Relaxed);
        self.saved
            .write()
            .expect("saved lock poisoned")
            .insert(dst.clone());
        self.links
            .write()
            .expect("links lock poisoned")
            .insert(Link::new(src, dst, LinkKind::Href));
    }

    /// Clones the finished state out into an immutable result.
    pub fn snapshot(&self) -> CrawlResults {
        CrawlResults {
            urls_seen: self.seen.read().expect("seen lock poisoned").clone(),
            visited_urls: self.visited.read().expect("visited lock poisoned").clone(),
            saved_urls: self.saved.read().expect("saved lock poisoned").clone(),
            links_remembered: self.links.read().expect("links lock poisoned").clone(),
            num_links_found: self.links_found.load(Ordering::Relaxed),
            num_pages_followed: self.pages_followed.load(Ordering::Relaxed),
        }
    }
}
