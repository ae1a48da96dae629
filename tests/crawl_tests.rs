//! End-to-end crawl scenarios against a local canned-response HTTP server.

use crawlmap::Crawl;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

#[derive(Clone)]
struct Page {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Page {
    fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
        }
    }

    fn with_links(links: &[&str]) -> Self {
        let anchors: Vec<String> = links
            .iter()
            .map(|l| format!("<a href=\"{}\">X</a>", l))
            .collect();
        Self::html(&format!("<html><body>{}</body></html>", anchors.join("\n")))
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Binds an ephemeral port and serves the given routes until the test ends.
/// Unknown paths get a 404. Returns the server's base URL.
async fn serve(routes: HashMap<&'static str, Page>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<&'static str, Page>> = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                // Read until the end of the request headers
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        Err(_) => return,
                    }
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();

                let page = routes.get(path.as_str()).cloned().unwrap_or(Page {
                    status: 404,
                    content_type: "text/html",
                    body: "<html><body>not here</body></html>".to_string(),
                });

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    page.status,
                    reason(page.status),
                    page.content_type,
                    page.body.len(),
                    page.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/", addr)
}

fn url(base: &str, path: &str) -> Url {
    Url::parse(base).unwrap().join(path).unwrap()
}

#[tokio::test]
async fn test_depth_zero_saves_root_links() {
    // Scenario A: two links on the root page, depth 0
    let base = serve(HashMap::from([("/", Page::with_links(&[
        "/a.html", "/b.html",
    ]))]))
    .await;

    let results = Crawl::new(&base).with_depth_limit(0).run().await.unwrap();

    let expected = [url(&base, "/a.html"), url(&base, "/b.html")];
    assert_eq!(results.saved_urls, expected.iter().cloned().collect());

    // Only the root was fetched, no matter how many links it carries
    assert_eq!(
        results.visited_urls,
        [Url::parse(&base).unwrap()].into_iter().collect()
    );
    assert_eq!(results.num_pages_followed, 1);
    assert_eq!(results.num_links_found, 2);
}

#[tokio::test]
async fn test_confinement_limits_saved_urls() {
    // Scenario B: confine to /foo; the off-prefix link is seen but not saved
    let base = serve(HashMap::from([(
        "/foo/foo.html",
        Page::with_links(&["/foo/bar.html", "/bar/baz.html"]),
    )]))
    .await;

    let root = url(&base, "/foo/foo.html");
    let results = Crawl::new(root.as_str())
        .with_depth_limit(0)
        .with_confine("/foo")
        .run()
        .await
        .unwrap();

    assert_eq!(
        results.saved_urls,
        [url(&base, "/foo/bar.html")].into_iter().collect()
    );
    assert!(results.urls_seen.contains(&url(&base, "/bar/baz.html")));
}

#[tokio::test]
async fn test_404_page_contributes_no_links() {
    // Scenario C: a followed link 404s; the crawl carries on
    let base = serve(HashMap::from([("/", Page::with_links(&["/missing.html"]))])).await;

    let results = Crawl::new(&base).with_depth_limit(1).run().await.unwrap();

    // The broken page was followed but produced nothing
    assert!(results.visited_urls.contains(&url(&base, "/missing.html")));
    assert_eq!(results.links_remembered.len(), 1);
    assert_eq!(results.saved_urls.len(), 1);
}

#[tokio::test]
async fn test_non_html_page_is_skipped() {
    // Scenario D: application/pdf is fetched but yields zero links
    let mut routes = HashMap::new();
    routes.insert("/", Page::with_links(&["/doc.pdf"]));
    routes.insert(
        "/doc.pdf",
        Page {
            status: 200,
            content_type: "application/pdf",
            body: "%PDF-1.4 <a href=\"/never.html\">x</a>".to_string(),
        },
    );
    let base = serve(routes).await;

    let results = Crawl::new(&base).with_depth_limit(1).run().await.unwrap();

    assert!(results.visited_urls.contains(&url(&base, "/doc.pdf")));
    assert!(!results.urls_seen.contains(&url(&base, "/never.html")));
    assert_eq!(
        results.saved_urls,
        [url(&base, "/doc.pdf")].into_iter().collect()
    );
}

#[tokio::test]
async fn test_exclusion_blocks_following() {
    let mut routes = HashMap::new();
    routes.insert("/", Page::with_links(&["/bar/x.html", "/ok.html"]));
    routes.insert("/bar/x.html", Page::with_links(&["/bar/deeper.html"]));
    routes.insert("/ok.html", Page::html("<html><body>ok</body></html>"));
    let base = serve(routes).await;

    let results = Crawl::new(&base)
        .with_depth_limit(2)
        .with_exclude(vec!["/bar".to_string()])
        .run()
        .await
        .unwrap();

    // The excluded page is never followed, so its own links are never seen
    assert!(!results.visited_urls.contains(&url(&base, "/bar/x.html")));
    assert!(!results.urls_seen.contains(&url(&base, "/bar/deeper.html")));
    assert!(results.visited_urls.contains(&url(&base, "/ok.html")));
}

#[tokio::test]
async fn test_depth_limit_stops_following() {
    let mut routes = HashMap::new();
    routes.insert("/", Page::with_links(&["/1.html"]));
    routes.insert("/1.html", Page::with_links(&["/2.html"]));
    routes.insert("/2.html", Page::with_links(&["/3.html"]));
    let base = serve(routes).await;

    let results = Crawl::new(&base).with_depth_limit(1).run().await.unwrap();

    assert!(results.visited_urls.contains(&url(&base, "/1.html")));
    assert!(!results.visited_urls.contains(&url(&base, "/2.html")));
    // Depth-2 link was observed on the depth-1 page, just not followed
    assert!(results.urls_seen.contains(&url(&base, "/2.html")));
    assert!(!results.urls_seen.contains(&url(&base, "/3.html")));
}

#[tokio::test]
async fn test_cyclic_site_terminates() {
    // Mutually-linked pages; the pool must drain instead of looping
    let mut routes = HashMap::new();
    routes.insert("/", Page::with_links(&["/a.html", "/b.html"]));
    routes.insert("/a.html", Page::with_links(&["/b.html", "/"]));
    routes.insert("/b.html", Page::with_links(&["/a.html", "/"]));
    let base = serve(routes).await;

    let results = Crawl::new(&base)
        .with_depth_limit(5)
        .with_workers(4)
        .run()
        .await
        .unwrap();

    assert!(results.visited_urls.contains(&url(&base, "/a.html")));
    assert!(results.visited_urls.contains(&url(&base, "/b.html")));
    // Each unique edge appears once in the graph
    let edges: Vec<_> = results
        .links_remembered
        .iter()
        .filter(|l| l.dst == url(&base, "/a.html").as_str())
        .collect();
    assert_eq!(edges.len(), 2);
}

#[tokio::test]
async fn test_fragments_are_stripped_before_dedup() {
    let mut routes = HashMap::new();
    routes.insert("/", Page::with_links(&["/a.html#one", "/a.html#two"]));
    routes.insert("/a.html", Page::html("<html><body>a</body></html>"));
    let base = serve(routes).await;

    let results = Crawl::new(&base).with_depth_limit(1).run().await.unwrap();

    assert_eq!(
        results.saved_urls,
        [url(&base, "/a.html")].into_iter().collect()
    );
    // Both fragment variants normalize to one frontier entry
    let visits: Vec<_> = results
        .visited_urls
        .iter()
        .filter(|u| u.path() == "/a.html")
        .collect();
    assert_eq!(visits.len(), 1);
}

#[tokio::test]
async fn test_external_hosts_are_not_followed() {
    let base = serve(HashMap::from([(
        "/",
        Page::with_links(&["http://external.invalid/page", "/local.html"]),
    )]))
    .await;

    let results = Crawl::new(&base).with_depth_limit(1).run().await.unwrap();

    let external = Url::parse("http://external.invalid/page").unwrap();
    assert!(results.urls_seen.contains(&external));
    assert!(!results.visited_urls.contains(&external));
    assert!(!results.saved_urls.contains(&external));
    assert!(results.visited_urls.contains(&url(&base, "/local.html")));
}

#[tokio::test]
async fn test_no_filter_seen_saves_external_links() {
    let base = serve(HashMap::from([(
        "/",
        Page::with_links(&["http://external.invalid/page", "/local.html"]),
    )]))
    .await;

    let results = Crawl::new(&base)
        .with_depth_limit(0)
        .with_filter_seen(false)
        .run()
        .await
        .unwrap();

    let external = Url::parse("http://external.invalid/page").unwrap();
    assert!(results.saved_urls.contains(&external));
    assert!(results.saved_urls.contains(&url(&base, "/local.html")));
}
