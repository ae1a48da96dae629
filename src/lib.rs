// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod filter;
pub mod results;
pub mod state;
pub mod urls;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::CrawlConfig;
pub use error::CrawlError;
pub use results::{CrawlResults, Link, LinkKind};

/// Builder for configuring and running one crawl
pub struct Crawl {
    config: CrawlConfig,
}

impl Crawl {
    /// Create a new crawl rooted at the given URL, with default settings
    pub fn new(root: &str) -> Self {
        Self {
            config: CrawlConfig::new(root),
        }
    }

    /// Create a crawl from an existing configuration
    pub fn with_config(config: CrawlConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a JSON file
    pub fn with_config_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, CrawlError> {
        Ok(Self {
            config: CrawlConfig::from_file(path)?,
        })
    }

    /// Set the maximum link depth (0 means fetch the root only)
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.config.depth_limit = depth_limit;
        self
    }

    /// Confine following and saving to paths starting with this prefix
    pub fn with_confine(mut self, prefix: &str) -> Self {
        self.config.confine = Some(prefix.to_string());
        self
    }

    /// Block following for paths starting with any of these prefixes
    pub fn with_exclude(mut self, prefixes: Vec<String>) -> Self {
        self.config.exclude = prefixes;
        self
    }

    /// Apply the scope filters to the save set (true by default)
    pub fn with_filter_seen(mut self, filter_seen: bool) -> Self {
        self.config.filter_seen = filter_seen;
        self
    }

    /// Set the number of concurrent workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Run the crawl to completion and return the finished state
    pub async fn run(self) -> Result<CrawlResults, CrawlError> {
        crawlers::web::start(&self.config).await
    }
}
