use crate::state::CrawlState;
use std::fmt;
use url::Url;

/// Scope constraints shared by every filter in a crawl.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// Host of the root URL; the same-host filter compares against this.
    pub root_host: Option<String>,

    /// If set, only URLs whose path starts with this prefix pass.
    pub confine_prefix: Option<String>,

    /// URLs whose path starts with any of these prefixes are rejected.
    pub exclude_prefixes: Vec<String>,
}

impl CrawlScope {
    pub fn new(root: &Url, confine: Option<String>, exclude: Vec<String>) -> Self {
        Self {
            root_host: root.host_str().map(|h| h.to_string()),
            confine_prefix: confine,
            exclude_prefixes: exclude,
        }
    }
}

/// A named predicate over `(url, scope, state)`.
///
/// Filters only read state; the calling worker applies the accept/reject
/// decision. Composed via short-circuiting conjunction, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlFilter {
    /// No confine prefix configured, or the path starts with it.
    PrefixOk,
    /// The path starts with none of the exclusion prefixes.
    ExcludeOk,
    /// The URL has not been fetched yet.
    NotVisited,
    /// The URL's host equals the root host.
    SameHost,
}

impl UrlFilter {
    pub fn accepts(&self, url: &Url, scope: &CrawlScope, state: &CrawlState) -> bool {
        match self {
            UrlFilter::PrefixOk => match &scope.confine_prefix {
                Some(prefix) => url.path().starts_with(prefix.as_str()),
                None => true,
            },
            UrlFilter::ExcludeOk => !scope
                .exclude_prefixes
                .iter()
                .any(|p| url.path().starts_with(p.as_str())),
            UrlFilter::NotVisited => !state.is_visited(url),
            UrlFilter::SameHost => match &scope.root_host {
                Some(host) => url.host_str() == Some(host.as_str()),
                None => false,
            },
        }
    }
}

impl fmt::Display for UrlFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UrlFilter::PrefixOk => "prefix-ok",
            UrlFilter::ExcludeOk => "exclude-ok",
            UrlFilter::NotVisited => "not-visited",
            UrlFilter::SameHost => "same-host",
        };
        write!(f, "{}", name)
    }
}

/// The two ordered filter lists of one crawl.
#[derive(Debug, Clone)]
pub struct FilterSet {
    scope: CrawlScope,
    pre_visit: Vec<UrlFilter>,
    save: Vec<UrlFilter>,
}

impl FilterSet {
    /// Builds the standard pipeline. `filter_seen` selects whether the save
    /// list applies scope checks or saves everything.
    pub fn new(scope: CrawlScope, filter_seen: bool) -> Self {
        let pre_visit = vec![
            UrlFilter::PrefixOk,
            UrlFilter::ExcludeOk,
            UrlFilter::NotVisited,
            UrlFilter::SameHost,
        ];
        let save = if filter_seen {
            vec![UrlFilter::PrefixOk, UrlFilter::SameHost]
        } else {
            Vec::new()
        };
        Self {
            scope,
            pre_visit,
            save,
        }
    }

    /// True iff every pre-visit filter accepts, evaluated left to right.
    pub fn follow_ok(&self, url: &Url, state: &CrawlState) -> bool {
        self.pre_visit
            .iter()
            .all(|f| f.accepts(url, &self.scope, state))
    }

    /// Every pre-visit filter that rejects the URL. Used for the advisory
    /// diagnostic when the root item itself fails the pipeline.
    pub fn follow_rejections(&self, url: &Url, state: &CrawlState) -> Vec<UrlFilter> {
        self.pre_visit
            .iter()
            .copied()
            .filter(|f| !f.accepts(url, &self.scope, state))
            .collect()
    }

    /// True iff every save filter accepts. An empty save list saves
    /// everything.
    pub fn save_ok(&self, url: &Url, state: &CrawlState) -> bool {
        self.save.iter().all(|f| f.accepts(url, &self.scope, state))
    }
}
