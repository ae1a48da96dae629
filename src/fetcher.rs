use crate::error::CrawlError;
use crate::{urls, utils};
use reqwest::{Client, StatusCode, header};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// User-Agent sent with every request
const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches one page and extracts its outgoing links.
///
/// Stateless with respect to the crawl; workers share a single instance for
/// connection reuse. Every failure path degrades to "zero links discovered"
/// plus a log line, so `fetch` never propagates an error to the worker loop.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(request_timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(AGENT)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the absolute link targets found on it,
    /// deduplicated in first-seen order. Failures yield an empty list.
    pub async fn fetch(&self, url: &Url) -> Vec<Url> {
        match self.try_fetch(url).await {
            Ok(links) => links,
            Err(CrawlError::NotFound(u)) => {
                ::log::warn!("Not found: {}", u);
                Vec::new()
            }
            Err(e @ CrawlError::HttpStatus { .. }) => {
                ::log::warn!("{}", e);
                Vec::new()
            }
            Err(CrawlError::NotInterested { content_type, url }) => {
                ::log::info!("Skipping {}, has type {}", url, content_type);
                Vec::new()
            }
            Err(e) => {
                ::log::error!("Failed to fetch {}: {}", url, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &Url) -> Result<Vec<Url>, CrawlError> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        // The response URL is the final one, after redirects; hrefs resolve
        // against it rather than the requested URL
        let final_url = response.url().clone();

        if status == StatusCode::NOT_FOUND {
            return Err(CrawlError::NotFound(final_url));
        }
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                status,
                url: final_url,
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(content_type_essence)
            .unwrap_or_default();
        if content_type != "text/html" {
            return Err(CrawlError::NotInterested {
                content_type,
                url: final_url,
            });
        }

        let body = response.text().await?;
        Ok(resolve_hrefs(&extract_hrefs(&body), &final_url))
    }
}

/// Extracts the href attribute of every anchor element that has one.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");
    let hrefs = doc
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("found {} hrefs", hrefs.len());
    hrefs
}

/// Resolves raw hrefs against the page's final URL, dropping ones that do
/// not parse and deduplicating while preserving first-seen order.
fn resolve_hrefs(hrefs: &[String], base: &Url) -> Vec<Url> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for href in hrefs {
        match urls::resolve(base, &utils::escape_href(href)) {
            Ok(resolved) => {
                if seen.insert(resolved.clone()) {
                    out.push(resolved);
                }
            }
            Err(e) => {
                ::log::debug!("Skipping href on {}: {}", base, e);
            }
        }
    }
    out
}

/// Media type without parameters, lowercased: `"Text/HTML; charset=utf-8"`
/// becomes `"text/html"`.
fn content_type_essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
