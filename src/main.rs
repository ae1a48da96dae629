use clap::Parser;
use crawlmap::export::{self, DotWriter};
use crawlmap::fetcher::Fetcher;
use crawlmap::{Crawl, CrawlError, urls};
use std::time::Duration;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CrawlError> {
    if args.links_only {
        return list_links(&args.url).await;
    }

    let start_time = std::time::Instant::now();

    let mut crawl = Crawl::new(&args.url)
        .with_depth_limit(args.depth)
        .with_exclude(args.exclude.clone())
        .with_filter_seen(!args.no_filter_seen)
        .with_workers(args.workers);
    if let Some(confine) = &args.confine {
        crawl = crawl.with_confine(confine);
    }

    let results = crawl.run().await?;

    if args.out_urls {
        println!("{}", export::url_listing(&results.urls_seen));
    }

    if args.out_links {
        println!("{}", export::link_listing(&results.links_remembered));
    }

    if args.out_dot {
        println!("{}", DotWriter::new().as_dot(&results.links_remembered));
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    let rate = if elapsed > 0.0 {
        (results.num_links_found as f64 / elapsed).ceil() as usize
    } else {
        0
    };
    ::log::info!("Found:    {}", results.num_links_found);
    ::log::info!("Followed: {}", results.num_pages_followed);
    ::log::info!("Stats:    ({}/s after {:.2}s)", rate, elapsed);

    Ok(())
}

/// Fetch a single page and print its enumerated outgoing links
async fn list_links(url: &str) -> Result<(), CrawlError> {
    let target = urls::parse_absolute(url)?;
    let fetcher = Fetcher::new(Duration::from_secs(30))?;
    for (i, link) in fetcher.fetch(&target).await.iter().enumerate() {
        println!("{}. {}", i, link);
    }
    Ok(())
}
