use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for one crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL to start crawling from
    pub root: String,

    /// Maximum link depth from the root (0 means fetch the root only)
    #[serde(default = "default_depth_limit")]
    pub depth_limit: usize,

    /// If set, restrict following and saving to URLs whose path starts
    /// with this prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confine: Option<String>,

    /// Path prefixes that block following
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Apply the scope filters to the save set; false saves every
    /// discovered link regardless of scope
    #[serde(default = "default_filter_seen")]
    pub filter_seen: bool,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Default depth limit
fn default_depth_limit() -> usize {
    30
}

/// Default save-filter behavior
fn default_filter_seen() -> bool {
    true
}

/// Default worker pool size
fn default_workers() -> usize {
    10
}

/// Default per-request timeout
fn default_request_timeout_secs() -> u64 {
    30
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            depth_limit: default_depth_limit(),
            confine: None,
            exclude: Vec::new(),
            filter_seen: default_filter_seen(),
            workers: default_workers(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrawlError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}
