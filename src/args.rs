use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "crawlmap")]
#[command(about = "Bounded-depth web crawler that maps the links it finds")]
#[command(version)]
pub struct Args {
    /// Seed URL to crawl from
    pub url: String,

    /// Get links for the specified URL only (no crawl)
    #[arg(short = 'l', long = "links", default_value_t = false)]
    pub links_only: bool,

    /// Maximum depth to traverse
    #[arg(short, long, default_value_t = 30)]
    pub depth: usize,

    /// Confine crawl to paths starting with this prefix
    #[arg(short, long)]
    pub confine: Option<String>,

    /// Exclude paths starting with this prefix (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Output links found
    #[arg(short = 'L', long = "show-links", default_value_t = false)]
    pub out_links: bool,

    /// Output URLs found
    #[arg(
        short = 'u',
        long = "show-urls",
        default_value_t = false,
        conflicts_with = "out_links"
    )]
    pub out_urls: bool,

    /// Output a Graphviz dot file of the link graph
    #[arg(short = 'D', long = "dot", default_value_t = false)]
    pub out_dot: bool,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 10)]
    pub workers: usize,

    /// Save every discovered link instead of only in-scope ones
    #[arg(long = "no-filter-seen", default_value_t = false)]
    pub no_filter_seen: bool,
}
