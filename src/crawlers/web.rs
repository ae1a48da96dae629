use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetcher::Fetcher;
use crate::filter::{CrawlScope, FilterSet};
use crate::results::CrawlResults;
use crate::state::CrawlState;
use crate::urls;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use url::Url;

/// One unit of crawl work: a URL and its hop distance from the root.
#[derive(Debug, Clone)]
struct WorkItem {
    url: Url,
    depth: usize,
}

/// Everything a worker shares with its siblings for the duration of one
/// crawl. The frontier receiver sits behind an async mutex so the fixed
/// pool pulls from a single queue.
struct CrawlContext {
    config: CrawlConfig,
    filters: FilterSet,
    fetcher: Fetcher,
    state: CrawlState,
    frontier_tx: mpsc::UnboundedSender<WorkItem>,
    frontier_rx: Mutex<mpsc::UnboundedReceiver<WorkItem>>,

    /// Items enqueued but not yet fully processed. Incremented before every
    /// send, decremented only after a worker finishes an item, so it reaches
    /// zero exactly when the frontier is empty and no worker is active.
    pending: AtomicUsize,
    done_tx: watch::Sender<bool>,
}

/// Runs a complete crawl and returns the finished state.
pub async fn start(config: &CrawlConfig) -> Result<CrawlResults, CrawlError> {
    ::log::info!(
        "Crawling {} (max depth: {})",
        config.root,
        config.depth_limit
    );

    let root = urls::normalize(&urls::parse_absolute(&config.root)?);
    let scope = CrawlScope::new(&root, config.confine.clone(), config.exclude.clone());
    let filters = FilterSet::new(scope, config.filter_seen);
    let fetcher = Fetcher::new(Duration::from_secs(config.request_timeout_secs))?;

    let (frontier_tx, frontier_rx) = mpsc::unbounded_channel();
    let (done_tx, done_rx) = watch::channel(false);

    let ctx = Arc::new(CrawlContext {
        config: config.clone(),
        filters,
        fetcher,
        state: CrawlState::new(),
        frontier_tx,
        frontier_rx: Mutex::new(frontier_rx),
        pending: AtomicUsize::new(0),
        done_tx,
    });

    // Seed the frontier with the root item unconditionally
    enqueue(
        &ctx,
        WorkItem {
            url: root,
            depth: 0,
        },
    );

    let workers = ctx.config.workers.max(1);
    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let ctx = Arc::clone(&ctx);
        let done_rx = done_rx.clone();
        handles.push(tokio::spawn(worker_loop(worker_id, ctx, done_rx)));
    }

    // The crawl is finished when the pending counter hits zero: frontier
    // empty and every worker idle, observed atomically
    let mut done_rx = done_rx;
    while !*done_rx.borrow() {
        if done_rx.changed().await.is_err() {
            break;
        }
    }

    for handle in handles {
        if let Err(e) = handle.await {
            ::log::error!("Worker task panicked: {}", e);
        }
    }

    let results = ctx.state.snapshot();
    ::log::info!(
        "Crawl complete: {} pages followed, {} links found",
        results.num_pages_followed,
        results.num_links_found
    );
    Ok(results)
}

/// Adds an item to the frontier, accounting for it in the pending counter
/// before the send so termination cannot be observed early.
fn enqueue(ctx: &CrawlContext, item: WorkItem) {
    ctx.pending.fetch_add(1, Ordering::SeqCst);
    if ctx.frontier_tx.send(item).is_err() {
        // Receiver gone, crawl is shutting down
        ctx.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Marks one item fully processed; the worker that drops the pending count
/// to zero declares the crawl finished.
fn finish_item(ctx: &CrawlContext) {
    if ctx.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
        let _ = ctx.done_tx.send(true);
    }
}

/// Pulls items from the frontier until the crawl is declared finished.
async fn worker_loop(worker_id: usize, ctx: Arc<CrawlContext>, mut done_rx: watch::Receiver<bool>) {
    ::log::trace!("Worker {} started", worker_id);

    loop {
        if *done_rx.borrow() {
            break;
        }

        let item = {
            let mut rx = ctx.frontier_rx.lock().await;
            tokio::select! {
                item = rx.recv() => item,
                _ = done_rx.changed() => None,
            }
        };
        let Some(item) = item else { break };

        if let Err(e) = process_item(worker_id, &ctx, &item).await {
            ::log::error!("Can't process url '{}' ({})", item.url, e);
        }
        finish_item(&ctx);
    }

    ::log::trace!("Worker {} shutting down", worker_id);
}

/// Handles one work item: filter, fetch, and feed discovered links back
/// into the state and the frontier.
async fn process_item(
    worker_id: usize,
    ctx: &CrawlContext,
    item: &WorkItem,
) -> Result<(), CrawlError> {
    if !ctx.filters.follow_ok(&item.url, &ctx.state) {
        if item.depth == 0 {
            // The root item is advisory-only: report the rejection and
            // fetch it anyway
            let rejected = ctx.filters.follow_rejections(&item.url, &ctx.state);
            let names: Vec<String> = rejected.iter().map(|f| f.to_string()).collect();
            ::log::warn!(
                "Starting URL {} rejected by filters: {}",
                item.url,
                names.join(", ")
            );
        } else {
            ::log::trace!("Worker {} not following {}", worker_id, item.url);
            return Ok(());
        }
    }

    ctx.state.mark_visited(&item.url);
    ::log::debug!(
        "Worker {} fetching {} (depth {})",
        worker_id,
        item.url,
        item.depth
    );

    let links = ctx.fetcher.fetch(&item.url).await;
    for link in links {
        let link = urls::normalize(&link);

        if ctx.state.mark_seen(&link) && item.depth < ctx.config.depth_limit {
            enqueue(
                ctx,
                WorkItem {
                    url: link.clone(),
                    depth: item.depth + 1,
                },
            );
        }

        if ctx.filters.save_ok(&link, &ctx.state) {
            ctx.state.record_saved(&item.url, &link);
        }
    }

    Ok(())
}
