use crate::results::Link;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Renders the recorded link graph as a Graphviz dot document.
///
/// Each distinct URL string gets a sequentially-numbered alias (`N0`,
/// `N1`, ...) the first time it appears as a source or destination; each
/// alias is declared once with the URL as its label, and each link becomes
/// one edge statement. Links are sorted before aliasing so the output is
/// deterministic even though the input set is unordered.
#[derive(Debug, Default)]
pub struct DotWriter {
    node_alias: HashMap<String, String>,
    node_decls: Vec<String>,
}

impl DotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_dot(mut self, links: &HashSet<Link>) -> String {
        let mut ordered: Vec<&Link> = links.iter().collect();
        ordered.sort_by(|a, b| (&a.src, &a.dst).cmp(&(&b.src, &b.dst)));

        let mut edges = Vec::with_capacity(ordered.len());
        for link in ordered {
            let src = self.alias(&link.src);
            let dst = self.alias(&link.dst);
            edges.push(format!("\t{} -> {};", src, dst));
        }

        let mut dot = String::from("digraph Crawl {\n\tedge [K=0.2, len=0.1];\n");
        for decl in &self.node_decls {
            dot.push_str(decl);
            dot.push('\n');
        }
        for edge in &edges {
            dot.push_str(edge);
            dot.push('\n');
        }
        dot.push('}');
        dot
    }

    fn alias(&mut self, node: &str) -> String {
        if let Some(existing) = self.node_alias.get(node) {
            return existing.clone();
        }
        let name = format!("N{}", self.node_alias.len());
        self.node_alias.insert(node.to_string(), name.clone());
        self.node_decls
            .push(format!("\t{} [label=\"{}\"];", name, node));
        name
    }
}

/// Plain listing of URLs, one per line, sorted.
pub fn url_listing(urls: &HashSet<Url>) -> String {
    let mut lines: Vec<&str> = urls.iter().map(|u| u.as_str()).collect();
    lines.sort_unstable();
    lines.join("\n")
}

/// Plain listing of links as `src -> dst`, one per line, sorted.
pub fn link_listing(links: &HashSet<Link>) -> String {
    let mut lines: Vec<String> = links.iter().map(|l| l.to_string()).collect();
    lines.sort_unstable();
    lines.join("\n")
}
